use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The symmetric secret used to sign access tokens.
    pub token_secret: Zeroizing<String>,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Password assigned to the seeded admin account.
    pub admin_password: Zeroizing<String>,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let token_secret = env::var("TOKEN_SECRET")
            .context("TOKEN_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if token_secret.len() < 32 {
            anyhow::bail!("TOKEN_SECRET must be at least 32 characters");
        }

        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("⚠️ ADMIN_PASSWORD not set, seeding admin with default password");
            "admin".to_string()
        });

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            token_secret: Zeroizing::new(token_secret),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .context("Invalid TOKEN_TTL_MINUTES")?,
            admin_password: Zeroizing::new(admin_password),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
        })
    }
}
