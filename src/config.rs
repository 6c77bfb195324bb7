use std::env;

use crate::auth::password::DEFAULT_COST;
use crate::error::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Process configuration, read once from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let server_port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| config_error(format!("PORT must be a number, got {:?}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
                .ok_or_else(|| {
                    config_error(format!(
                        "BCRYPT_COST must be between {} and {}, got {:?}",
                        MIN_BCRYPT_COST,
                        MAX_BCRYPT_COST,
                        raw
                    ))
                })?,
            Err(_) => DEFAULT_COST,
        };

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| config_error("JWT_SECRET must be set".into()))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            jwt_secret,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn config_error(msg: String) -> AppError {
    AppError::InternalServerError(format!("Invalid configuration: {}", msg))
}
