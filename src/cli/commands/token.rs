use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, AuthUser, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Subject (user id) of the token")]
    pub user_id: String,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "user")]
    pub role: String,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = AuthUser {
        user_id: args.user_id,
        user_name: args.name,
        user_email: args.email,
        role: args.role,
    };
    let claims = Claims::for_user(&user);
    let token = generate_jwt(&claims)?;

    output_success(
        output_format,
        "Token generated",
        Some(json!({
            "token": token,
            "expiresAt": claims.exp,
            "expiresInHours": config().security.jwt_expiry_hours,
        })),
        Some(&token),
    )
}
