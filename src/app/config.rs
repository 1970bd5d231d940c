use std::{env, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable `{0}` not set")]
    Missing(&'static str),
    #[error("environment variable `{key}` has invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub bind_addr: String,
    pub port: u16,
    /// Lifetime of a login token in redis, and of the cookie carrying it.
    pub session_ttl_secs: usize,
    pub db_pool_size: u32,
    pub bcrypt_cost: u32,
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::from("postgres://localhost/blogchat"),
            redis_url: String::from("redis://127.0.0.1/"),
            bind_addr: String::from("127.0.0.1"),
            port: 8080,
            session_ttl_secs: 1800,
            db_pool_size: 10,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            secure_cookies: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", defaults.db_pool_size)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)?,
            secure_cookies: parse_or(&lookup, "SECURE_COOKIES", defaults.secure_cookies)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn defaults_fill_missing_values() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/app")])).unwrap();

        assert_eq!(config.database_url, "postgres://db/app");
        assert_eq!(config.redis_url, "redis://127.0.0.1/");
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl_secs, 1800);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("PORT", "9000"),
            ("SESSION_TTL_SECS", " 60 "),
            ("BCRYPT_COST", "4"),
            ("SECURE_COOKIES", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.session_ttl_secs, 60);
        assert_eq!(config.bcrypt_cost, 4);
        assert!(config.secure_cookies);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: String::from("eighty")
            }
        );
    }
}
