use std::env;
use std::fmt;

use chrono::Duration;

/// Which backend the storage handle talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    Postgres,
    Memory,
}

impl DbDriver {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbDriver::Postgres),
            "memory" => Ok(DbDriver::Memory),
            other => Err(ConfigError::Invalid("DB_DRIVER", other.to_string())),
        }
    }
}

/// One year; longer-lived tokens are refused at startup.
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_driver: DbDriver,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    Dotenv(dotenvy::Error),
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Dotenv(e) => write!(f, "couldn't load .env: {}", e),
            ConfigError::Missing(key) => write!(f, "{} missing, it is required", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Dotenv(e)),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_driver = match lookup("DB_DRIVER") {
            Some(raw) if !raw.trim().is_empty() => DbDriver::parse(&raw)?,
            _ => DbDriver::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if db_driver == DbDriver::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let port = lookup("PORT").ok_or(ConfigError::Missing("PORT"))?;
        let port = parse_port(&port)?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_ttl = match lookup("JWT_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| (1..=MAX_JWT_TTL_HOURS).contains(h))
                .and_then(Duration::try_hours)
                .ok_or(ConfigError::Invalid("JWT_TTL_HOURS", raw))?,
            None => Duration::hours(24),
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("DB_MAX_CONNECTIONS", raw))?,
            None => 5,
        };

        Ok(Self {
            host,
            port,
            db_driver,
            database_url,
            max_connections,
            jwt_secret,
            jwt_ttl,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Accepts both "5000" and the ":5000" listen-address form.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .trim_start_matches(':')
        .parse()
        .map_err(|_| ConfigError::Invalid("PORT", raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn postgres_is_the_default_driver() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("PORT", "5000"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.db_driver, DbDriver::Postgres);
        assert_eq!(config.addr(), "127.0.0.1:5000");
        assert_eq!(config.jwt_ttl, Duration::hours(24));
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn port_accepts_listen_address_form() {
        let config = Config::from_lookup(lookup(&[
            ("DB_DRIVER", "memory"),
            ("PORT", ":5000"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.db_driver, DbDriver::Memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = Config::from_lookup(lookup(&[("PORT", "5000"), ("JWT_SECRET", "secret")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn unknown_driver_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DB_DRIVER", "mysql"),
            ("DATABASE_URL", "mysql://localhost/todos"),
            ("PORT", "5000"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("DB_DRIVER", _)));
    }

    #[test]
    fn missing_port_and_secret_are_reported() {
        let err = Config::from_lookup(lookup(&[("DB_DRIVER", "memory"), ("JWT_SECRET", "s")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("PORT")));

        let err = Config::from_lookup(lookup(&[("DB_DRIVER", "memory"), ("PORT", "80")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DB_DRIVER", "memory"),
            ("PORT", "eighty"),
            ("JWT_SECRET", "s"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT", _)));

        let err = Config::from_lookup(lookup(&[
            ("DB_DRIVER", "memory"),
            ("PORT", "80"),
            ("JWT_SECRET", "s"),
            ("JWT_TTL_HOURS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("JWT_TTL_HOURS", _)));
    }

    #[test]
    fn token_lifetime_is_bounded() {
        let with_ttl = |ttl: &str| {
            let ttl = ttl.to_string();
            Config::from_lookup(move |key: &str| match key {
                "DB_DRIVER" => Some("memory".to_string()),
                "PORT" => Some("80".to_string()),
                "JWT_SECRET" => Some("s".to_string()),
                "JWT_TTL_HOURS" => Some(ttl.clone()),
                _ => None,
            })
        };

        let config = with_ttl(&MAX_JWT_TTL_HOURS.to_string()).unwrap();
        assert_eq!(config.jwt_ttl, Duration::hours(MAX_JWT_TTL_HOURS));
        assert_eq!(with_ttl("1").unwrap().jwt_ttl, Duration::hours(1));

        for ttl in [
            (MAX_JWT_TTL_HOURS + 1).to_string(),
            "10000000000".to_string(),
            i64::MAX.to_string(),
            "-5".to_string(),
        ] {
            let err = with_ttl(&ttl).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid("JWT_TTL_HOURS", _)), "ttl: {}", ttl);
        }
    }
}
