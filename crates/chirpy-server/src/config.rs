use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub jwt_secret: String,
    pub polka_key: String,
    pub db_path: PathBuf,
    pub static_root: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    /// Read configuration from the environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("JWT_SECRET is unset or still a placeholder; set it in .env");
        }

        let polka_key = std::env::var("POLKA_KEY").unwrap_or_default();
        if polka_key.is_empty() {
            bail!("POLKA_KEY is unset; set it in .env");
        }

        let db_path: PathBuf = std::env::var("CHIRPY_DB_PATH")
            .unwrap_or_else(|_| "database.json".into())
            .into();
        let static_root: PathBuf = std::env::var("CHIRPY_ROOT")
            .unwrap_or_else(|_| ".".into())
            .into();
        let host = std::env::var("CHIRPY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("CHIRPY_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .context("CHIRPY_PORT must be a port number")?;

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("CHIRPY_HOST must be an IP address")?;

        Ok(Self {
            jwt_secret,
            polka_key,
            db_path,
            static_root,
            addr,
        })
    }
}
