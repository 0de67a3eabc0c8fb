//! `teamcollab token`: mint bearer tokens signed with the configured secret.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use teamcollab_auth::{JwtDecoder, JwtEncoder};
use teamcollab_core::error::AppError;
use teamcollab_core::types::UserId;
use teamcollab_entity::user::UserRole;

use crate::output::{OutputFormat, print_rows};

/// Arguments for `token`.
#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommands,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommands {
    /// Issue a token for a user
    Issue {
        /// User id placed in the `id` claim
        #[arg(short, long)]
        user: String,
        /// Role: `user` or `admin`
        #[arg(short, long, default_value = "user")]
        role: String,
        /// Optional email claim
        #[arg(short, long)]
        email: Option<String>,
        /// Lifetime in hours; defaults to `auth.token_ttl_hours`
        #[arg(long)]
        ttl_hours: Option<u64>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct IssuedToken {
    user_id: String,
    role: String,
    expires_at: String,
    token: String,
}

/// Dispatch a token subcommand.
pub fn execute(args: &TokenArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;

    match &args.command {
        TokenCommands::Issue {
            user,
            role,
            email,
            ttl_hours,
        } => {
            let user_id = UserId::new(user.trim());
            if user_id.is_empty() {
                return Err(AppError::validation("User id must not be empty"));
            }
            let role: UserRole = role.parse()?;
            let ttl_hours = ttl_hours.unwrap_or(config.auth.token_ttl_hours);
            let ttl_seconds = i64::try_from(ttl_hours.saturating_mul(3600))
                .map_err(|_| AppError::validation("Token lifetime is too large"))?;

            let token = JwtEncoder::new(&config.auth).issue_with_expiry(
                &user_id,
                role,
                email.as_deref(),
                ttl_seconds,
            )?;

            // Decode with the server's own verifier so a bad secret fails here.
            let claims = JwtDecoder::new(&config.auth).decode_token(&token)?;

            let issued = IssuedToken {
                user_id: claims.id.to_string(),
                role: claims.role.to_string(),
                expires_at: claims.expires_at().to_rfc3339(),
                token,
            };
            print_rows(std::slice::from_ref(&issued), &issued, format);
            Ok(())
        }
    }
}
