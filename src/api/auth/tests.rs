use super::types::{
    normalize_email, validate_registration, RegisterRequest, UserView,
};
use garage_core::auth::Role;
use garage_core::store::User;

fn request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        name: None,
    }
}

#[test]
fn test_valid_registration() {
    let email = validate_registration(&request("Bob@Garage.Test", "longenough")).unwrap();
    assert_eq!(email, "bob@garage.test");
}

#[test]
fn test_short_password_rejected() {
    assert!(validate_registration(&request("bob@garage.test", "short")).is_err());
}

#[test]
fn test_bad_emails_rejected() {
    for email in [
        "",
        "no-at-sign",
        "@nodomain.test",
        "user@",
        "user@nodot",
        "a b@c.test",
        "a@b@c.test",
    ] {
        assert!(
            normalize_email(email).is_err(),
            "'{}' should be rejected",
            email
        );
    }
}

#[test]
fn test_email_normalized() {
    assert_eq!(
        normalize_email("  Bob@Garage.Test ").unwrap(),
        "bob@garage.test"
    );
}

#[test]
fn test_user_view_hides_hash() {
    let user = User::new("bob@garage.test", "$2b$12$secret-hash").with_name("Bob");
    let view: UserView = user.into();

    let json = serde_json::to_string(&view).unwrap();
    assert!(json.contains("bob@garage.test"));
    assert!(!json.contains("secret-hash"));
}

#[test]
fn test_user_view_carries_role_and_active() {
    let user = User::new("admin@garage.test", "hash").with_role(Role::Admin);
    let view: UserView = user.into();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["role"], "admin");
    assert_eq!(json["active"], true);
}

#[test]
fn test_register_request_deserialization() {
    let json = r#"{"email": "bob@garage.test", "password": "longenough"}"#;
    let req: RegisterRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.email, "bob@garage.test");
    assert!(req.name.is_none());
}
