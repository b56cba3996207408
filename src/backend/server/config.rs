/**
 * Server Configuration
 *
 * This module loads the server configuration from the environment and opens
 * the SQLite connection pool.
 *
 * # Configuration Sources
 *
 * Values come from environment variables (a `.env` file is loaded by the
 * binary before this runs). Every value has a development default so the
 * server starts with no configuration at all; missing token secrets are
 * reported with a warning.
 *
 * | Variable                 | Default                      |
 * |--------------------------|------------------------------|
 * | `DATABASE_URL`           | `sqlite://chirp.db?mode=rwc` |
 * | `SERVER_PORT`            | `8000`                       |
 * | `ACCESS_TOKEN_SECRET`    | development secret           |
 * | `ACCESS_TOKEN_TTL_SECS`  | `900`                        |
 * | `REFRESH_TOKEN_SECRET`   | development secret           |
 * | `REFRESH_TOKEN_TTL_SECS` | `864000`                     |
 * | `UPLOAD_DIR`             | `public/uploads`             |
 * | `BCRYPT_COST`            | `bcrypt::DEFAULT_COST`       |
 * | `APP_ENV`                | `production`                 |
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::backend::error::BackendError;

const DEV_ACCESS_SECRET: &str = "chirp-dev-access-secret-change-me";
const DEV_REFRESH_SECRET: &str = "chirp-dev-refresh-secret-change-me";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

/// Runtime configuration of the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub access_token_secret: String,
    /// Access token lifetime in seconds
    pub access_token_ttl: i64,
    pub refresh_token_secret: String,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl: i64,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://chirp.db?mode=rwc".to_string(),
            port: 8000,
            access_token_secret: DEV_ACCESS_SECRET.to_string(),
            access_token_ttl: 15 * 60,
            refresh_token_secret: DEV_REFRESH_SECRET.to_string(),
            refresh_token_ttl: 10 * 24 * 60 * 60,
            upload_dir: PathBuf::from("public/uploads"),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            environment: Environment::Production,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            port: env_or("SERVER_PORT", defaults.port),
            access_token_secret: secret_or("ACCESS_TOKEN_SECRET", defaults.access_token_secret),
            access_token_ttl: env_or("ACCESS_TOKEN_TTL_SECS", defaults.access_token_ttl),
            refresh_token_secret: secret_or("REFRESH_TOKEN_SECRET", defaults.refresh_token_secret),
            refresh_token_ttl: env_or("REFRESH_TOKEN_TTL_SECS", defaults.refresh_token_ttl),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost),
            environment: std::env::var("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(defaults.environment),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn secret_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            tracing::warn!("{} not set. Using the development secret.", key);
            default
        }
    }
}

/// Open a connection pool and bring the schema up to date
///
/// In-memory URLs (`sqlite::memory:`) get a single connection that is never
/// recycled, since every new connection would see an empty database. File
/// databases run in WAL mode so readers never wait on the writer.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, BackendError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let (options, pool_options) = if in_memory {
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        (options, pool_options)
    } else {
        let pool_options = SqlitePoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(5));
        (options.journal_mode(SqliteJournalMode::Wal), pool_options)
    };

    let pool = pool_options.connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Start a transaction holding the write lock from its first statement
///
/// A deferred transaction that reads and then writes fails with
/// `SQLITE_BUSY` when another writer got there first, without waiting for
/// the busy timeout. Every read-then-write unit of work goes through here.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Connect to the configured database, logging progress
pub async fn load_database(config: &ServerConfig) -> Result<SqlitePool, BackendError> {
    tracing::info!("Connecting to database...");

    let pool = connect_database(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to open database {}: {:?}", config.database_url, e);
        e
    })?;

    tracing::info!("Database ready, migrations applied");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse(" DEV "), Environment::Development);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Production);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert!(config.access_token_ttl < config.refresh_token_ttl);
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
        assert!(!config.is_development());
    }

    #[tokio::test]
    async fn test_connect_memory_database_runs_migrations() {
        let pool = connect_database("sqlite::memory:").await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('users', 'follows', 'posts', 'comments', 'post_likes', 'notifications', 'sessions')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 7);
    }
}
