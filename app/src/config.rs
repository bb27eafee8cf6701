use crate::error::ConfigError;
use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_ACQUIRE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_DASHBOARD_POLL_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    database_url: Option<String>,
    bind_addr: SocketAddr,
    db_max_connections: u32,
    db_acquire_timeout_ms: u64,
    run_migrations: bool,
    dashboard_poll_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let bind_addr = parse_or(&lookup, "BIND_ADDR", || {
            SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|e| {
                ConfigError::Invalid("BIND_ADDR", format!("{}: {}", DEFAULT_BIND_ADDR, e))
            })
        })?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", || {
            Ok(DEFAULT_DB_MAX_CONNECTIONS)
        })?;
        let db_acquire_timeout_ms = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_MS", || {
            Ok(DEFAULT_DB_ACQUIRE_TIMEOUT_MS)
        })?;
        let run_migrations = parse_or(&lookup, "RUN_MIGRATIONS", || Ok(true))?;
        let dashboard_poll_ms =
            parse_or(&lookup, "DASHBOARD_POLL_MS", || Ok(DEFAULT_DASHBOARD_POLL_MS))?;

        if db_max_connections == 0 {
            return Err(ConfigError::Invalid(
                "DB_MAX_CONNECTIONS",
                "must be at least 1".to_owned(),
            ));
        }
        if dashboard_poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "DASHBOARD_POLL_MS",
                "must be at least 1".to_owned(),
            ));
        }

        Ok(Config {
            database_url,
            bind_addr,
            db_max_connections,
            db_acquire_timeout_ms,
            run_migrations,
            dashboard_poll_ms,
        })
    }

    /// `None` runs the server on the in-memory store
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_acquire_timeout_ms(&self) -> u64 {
        self.db_acquire_timeout_ms
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations
    }

    pub fn dashboard_poll_ms(&self) -> u64 {
        self.dashboard_poll_ms
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> Result<T, ConfigError>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(key, format!("{}: {}", raw, e))),
        _ => default(),
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv::dotenv().ok();
    Config::from_env().unwrap_or_else(|e| panic!("{}", e))
});

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(None, config.database_url());
        assert_eq!(8080, config.bind_addr().port());
        assert_eq!(5, config.db_max_connections());
        assert_eq!(5000, config.db_acquire_timeout_ms());
        assert!(config.run_migrations());
        assert_eq!(5000, config.dashboard_poll_ms());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/aquapoll"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("RUN_MIGRATIONS", "false"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(Some("postgres://localhost/aquapoll"), config.database_url());
        assert_eq!("127.0.0.1:9000", config.bind_addr().to_string());
        assert!(!config.run_migrations());
        assert_eq!(12, config.db_max_connections());
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("DB_MAX_CONNECTIONS", _)));

        let err = Config::from_lookup(lookup_from(&[("DASHBOARD_POLL_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("DASHBOARD_POLL_MS", _)));
    }

    #[test]
    fn test_blank_database_url_is_unset() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(None, config.database_url());
    }
}
