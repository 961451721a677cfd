use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret. Absence is only an error once a token must be issued.
    pub secret: Option<String>,
    pub issuer: String,
}

/// Where the credential store lives: a full URL, or discrete `DB_*` parts.
#[derive(Debug, Clone, Deserialize)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        user: String,
        password: String,
        name: String,
        port: u16,
    },
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseConfig::Url(url) => PgConnectOptions::from_str(url).context("parse DATABASE_URL"),
            DatabaseConfig::Parts {
                host,
                user,
                password,
                name,
                port,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(name)
                .ssl_mode(PgSslMode::Disable)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = match std::env::var("DATABASE_URL") {
            Ok(url) => DatabaseConfig::Url(url),
            Err(_) => DatabaseConfig::Parts {
                host: std::env::var("DB_HOST").context("DB_HOST")?,
                user: std::env::var("DB_USER").context("DB_USER")?,
                password: std::env::var("DB_PASSWORD").context("DB_PASSWORD")?,
                name: std::env::var("DB_NAME").context("DB_NAME")?,
                port: match std::env::var("DB_PORT") {
                    Ok(p) => p.parse::<u16>().context("DB_PORT must be a port number")?,
                    Err(_) => 5432,
                },
            },
        };
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .or_else(|_| std::env::var("JWT_SALT"))
                .ok()
                .filter(|s| !s.trim().is_empty()),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "userauth".into()),
        };
        Ok(Self {
            database,
            max_connections,
            jwt,
        })
    }
}
