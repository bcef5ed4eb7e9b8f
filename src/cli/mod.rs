//! CLI module for the garage backend
//!
//! Provides commands:
//! - `serve`: Start the HTTP server (default)
//! - `create-admin`: Create or promote an admin account

use clap::{Parser, Subcommand};
use tracing::info;

use garage_core::auth::{hash_password, Role};
use garage_core::store::{Database, StoreError, User};

use crate::api::auth::types::{normalize_email, MIN_PASSWORD_LEN};

/// Bob's Garage backend CLI
#[derive(Parser, Debug)]
#[command(name = "garage")]
#[command(about = "Bob's Garage website backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Create an admin account, or promote an existing one
    CreateAdmin {
        /// Login email
        #[arg(long)]
        email: String,
        /// Password (min 8 characters)
        #[arg(long)]
        password: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::CreateAdmin {
            email,
            password,
            name,
        }) => create_admin(&email, &password, name.as_deref()).await,
        Some(Commands::Serve) | None => crate::server::run().await,
    }
}

/// Create an admin account from the command line.
///
/// If the email is already registered the account is promoted to admin
/// (and reactivated) instead; the password is left untouched in that
/// case.
async fn create_admin(email: &str, password: &str, name: Option<&str>) -> anyhow::Result<()> {
    let email =
        normalize_email(email).map_err(|_| anyhow::anyhow!("invalid email address: {}", email))?;
    if password.len() < MIN_PASSWORD_LEN {
        anyhow::bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let config = crate::server::load_config()?;
    let db = Database::connect(&config.database.url).await?;

    let mut user = User::new(email.clone(), hash_password(password)?).with_role(Role::Admin);
    if let Some(name) = name {
        user = user.with_name(name);
    }

    match db.create_user(&user).await {
        Ok(()) => {
            info!(user_id = %user.id, email = %email, "Admin account created");
            println!("Admin account created: {} ({})", email, user.id);
        }
        Err(StoreError::DuplicateEmail(_)) => {
            let existing = db
                .find_user_by_email(&email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("account vanished during promotion"))?;
            db.set_user_role(existing.id, Role::Admin).await?;
            db.set_user_active(existing.id, true).await?;
            info!(user_id = %existing.id, email = %email, "Existing account promoted to admin");
            println!("Existing account promoted to admin: {}", email);
        }
        Err(e) => return Err(e.into()),
    }

    db.record_audit(None, "user.create_admin", &format!("email:{}", email), None)
        .await?;

    Ok(())
}
