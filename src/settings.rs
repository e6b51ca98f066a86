//! Server settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::net::{IpAddr, SocketAddr};

/// How operation failures map to HTTP status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorStatusMode {
    /// Every failure is answered with 200 and an `{error}` body.
    Legacy,
    /// Failures carry a classified 4xx/5xx status; the body shape is unchanged.
    Strict,
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        match &self.password {
            Some(p) => opts.password(p),
            None => opts,
        }
    }

    /// Same server, maintenance `postgres` database. Used to create the target database.
    pub fn admin_connect_options(&self) -> PgConnectOptions {
        self.connect_options().database("postgres")
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    /// Normalized: empty, or a leading slash and no trailing slash.
    pub base_path: String,
    pub environment: String,
    pub error_status: ErrorStatusMode,
    pub ensure_schema: bool,
    pub database: DatabaseSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset and empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseSettings {
            database: get("PGDATABASE").unwrap_or_else(|| "postgres".into()),
            host: get("PGHOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(get("PGPORT"), "PGPORT", 5432)?,
            user: get("PGUSER").unwrap_or_else(|| "postgres".into()),
            password: get("PGPASSWORD"),
            max_connections: parse_or(get("PG_MAX_CONNECTIONS"), "PG_MAX_CONNECTIONS", 5)?,
        };

        let strict = parse_bool(get("STRICT_ERROR_STATUS"), "STRICT_ERROR_STATUS")?;

        Ok(Settings {
            host: parse_or(get("SERVER_HOST"), "SERVER_HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(get("SERVER_PORT"), "SERVER_PORT", 3000)?,
            base_path: normalize_base_path(get("API_BASE_PATH").as_deref().unwrap_or("")),
            environment: get("NODE_ENV").unwrap_or_else(|| "production".into()),
            error_status: if strict {
                ErrorStatusMode::Strict
            } else {
                ErrorStatusMode::Legacy
            },
            ensure_schema: parse_bool(get("ENSURE_SCHEMA"), "ENSURE_SCHEMA")?,
            database,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool(raw: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    let Some(v) = raw else { return Ok(false) };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: v }),
    }
}

/// "api/v1/" -> "/api/v1", "/" -> "".
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
