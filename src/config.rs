use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// The minimum length of the cookie signing secret, in bytes.
pub const SESSION_SECRET_MIN_BYTES: usize = 64;

/// Accepted range for `SESSION_DURATION_DAYS`.
pub const SESSION_DURATION_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

/// Where users, notes and sessions are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// PostgreSQL for users and notes, Redis for sessions.
    Postgres,
    /// Everything in process memory. Data is lost on restart.
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            other => anyhow::bail!("Unknown NOTES_BACKEND '{}' (expected postgres or memory)", other),
        }
    }
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The storage backend.
    pub backend: Backend,
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The key used to sign session cookies.
    pub session_secret: Zeroizing<Vec<u8>>,
    /// The address the server listens on.
    pub bind_addr: SocketAddr,
    /// Upper bound on the time spent handling one request.
    pub request_timeout_secs: u64,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let backend: Backend = env::var("NOTES_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let mut secret_hex = env::var("SESSION_SECRET")
            .context("SESSION_SECRET must be set (generate with: openssl rand -hex 64)")?;

        let secret_bytes = hex::decode(&secret_hex)
            .context("SESSION_SECRET must be valid hexadecimal")?;

        secret_hex.zeroize();

        if secret_bytes.len() < SESSION_SECRET_MIN_BYTES {
            anyhow::bail!(
                "SESSION_SECRET must be at least {} bytes ({} hex characters)",
                SESSION_SECRET_MIN_BYTES,
                SESSION_SECRET_MIN_BYTES * 2
            );
        }

        let database_url = match backend {
            Backend::Postgres => env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            Backend::Memory => env::var("DATABASE_URL").unwrap_or_default(),
        };

        Ok(Self {
            backend,
            database_url,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            session_duration_days: parse_session_days(
                &env::var("SESSION_DURATION_DAYS").unwrap_or_else(|_| "7".to_string()),
            )?,
            session_secret: Zeroizing::new(secret_bytes),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS")?,
            secure_cookies: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string()) == "production",
        })
    }

    /// Session lifetime in seconds.
    pub fn session_ttl_secs(&self) -> u64 {
        self.session_duration_days.clamp(0, *SESSION_DURATION_DAYS_RANGE.end()) as u64 * 86400
    }
}

fn parse_session_days(raw: &str) -> Result<i64> {
    let days: i64 = raw
        .trim()
        .parse()
        .context("Invalid SESSION_DURATION_DAYS")?;

    if !SESSION_DURATION_DAYS_RANGE.contains(&days) {
        anyhow::bail!(
            "SESSION_DURATION_DAYS must be between {} and {}",
            SESSION_DURATION_DAYS_RANGE.start(),
            SESSION_DURATION_DAYS_RANGE.end()
        );
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!("postgres".parse::<Backend>().unwrap(), Backend::Postgres);
        assert_eq!("MEMORY".parse::<Backend>().unwrap(), Backend::Memory);
        assert!("sqlite".parse::<Backend>().is_err());
    }

    #[test]
    fn session_days_must_be_in_range() {
        assert_eq!(parse_session_days("7").unwrap(), 7);
        assert_eq!(parse_session_days("1").unwrap(), 1);
        assert_eq!(parse_session_days("365").unwrap(), 365);
        assert!(parse_session_days("0").is_err());
        assert!(parse_session_days("-3").is_err());
        assert!(parse_session_days("366").is_err());
        assert!(parse_session_days("9223372036854775807").is_err());
        assert!(parse_session_days("week").is_err());
    }
}
