//! Password hashing and verification
//!
//! bcrypt with a per-call random salt at the library's default cost. The
//! cost is deliberately not configurable: every stored hash carries the
//! same work factor.

use bcrypt::DEFAULT_COST;

use crate::error::{Error, Result};

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, DEFAULT_COST).map_err(|e| Error::Credential(e.to_string()))
}

/// Verify a password against a stored hash.
///
/// Returns `false` for a malformed or foreign hash rather than erroring:
/// a broken row in the users table must read as "wrong password", not as
/// a 500.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2xx").unwrap();
        assert!(verify_password("hunter2xx", &hash));
        assert!(!verify_password("hunter2xy", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn test_malformed_hash_is_false_not_error() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "$2b$aa$garbage"));
    }
}
