use std::env;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

use crate::error::{config_error, Error};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DOCUMENTS_DIR: &str = "public/documents";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 30;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub auth: AuthConfig,
    /// Generated PDFs land here; the public path is `/documents/<filename>`.
    pub documents_dir: PathBuf,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// Signs dashboard session tokens (`NEXTAUTH_SECRET`).
    pub session_secret: String,
    /// Signs public API bearer tokens (`JWT_SECRET`).
    pub api_secret: String,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"****")
            .field("api_secret", &"****")
            .field("session_ttl", &self.session_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let database_url = required("DATABASE_URL")?;
        let session_secret = required("NEXTAUTH_SECRET")?;
        let api_secret = required("JWT_SECRET")?;

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.into());
        let port = parse_or("PORT", DEFAULT_PORT);
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let documents_dir = env::var("DOCUMENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOCUMENTS_DIR));
        let session_ttl_hours = within(
            "SESSION_TTL_HOURS",
            parse_or("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS),
            1..=MAX_SESSION_TTL_HOURS,
            DEFAULT_SESSION_TTL_HOURS,
        );
        let bcrypt_cost = parse_or("BCRYPT_COST", DEFAULT_BCRYPT_COST);

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            auth: AuthConfig {
                session_secret,
                api_secret,
                session_ttl: Duration::hours(session_ttl_hours),
                bcrypt_cost,
            },
            documents_dir,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr, Error> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| config_error(format!("invalid listen address {}:{}", self.host, self.port)))
    }
}

fn required(key: &str) -> Result<String, Error> {
    let value = env::var(key).map_err(|_| config_error(format!("{} must be set", key)))?;

    if value.trim().is_empty() {
        return Err(config_error(format!("{} must not be empty", key)));
    }

    Ok(value)
}

fn parse_or<T: FromStr + std::fmt::Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("{} is not a valid value for {}, using {}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

fn within<T: PartialOrd + std::fmt::Display + Copy>(
    key: &str,
    value: T,
    range: RangeInclusive<T>,
    default: T,
) -> T {
    if range.contains(&value) {
        return value;
    }

    tracing::warn!(
        "{} is outside {}..={} for {}, using {}",
        value,
        range.start(),
        range.end(),
        key,
        default
    );
    default
}
