//! Runtime configuration from environment variables (a `.env` file is loaded by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Upper bound on request body size, in bytes.
    pub body_limit: usize,
    /// Create the target database on startup when it does not exist.
    pub create_database: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `DATABASE_URL` wins; otherwise the URL is composed
    /// from `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => compose_database_url(&get),
        };
        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), Some(DEFAULT_MAX_CONNECTIONS))?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        let body_limit = parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), Some(DEFAULT_BODY_LIMIT))?;
        let create_database = match get("CREATE_DATABASE") {
            None => true,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "CREATE_DATABASE",
                value: v,
            })?,
        };

        Ok(AppConfig {
            database_url,
            bind_addr,
            max_connections,
            body_limit,
            create_database,
        })
    }
}

fn compose_database_url(get: &dyn Fn(&str) -> Option<String>) -> String {
    let host = get("DB_HOST").unwrap_or_else(|| "localhost".into());
    let port = get("DB_PORT").unwrap_or_else(|| "5432".into());
    let db = get("DB").unwrap_or_else(|| "devprojects".into());
    let credentials = match (get("DB_USER"), get("DB_PASSWORD")) {
        (Some(user), Some(password)) => format!("{}:{}@", user, password),
        (Some(user), None) => format!("{}@", user),
        _ => String::new(),
    };
    format!("postgres://{}{}:{}/{}", credentials, host, port, db)
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => default.ok_or_else(|| ConfigError::Load(format!("{} has no default", key))),
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.database_url, "postgres://localhost:5432/devprojects");
        assert_eq!(c.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_connections, 5);
        assert_eq!(c.body_limit, 64 * 1024);
        assert!(c.create_database);
    }

    #[test]
    fn database_url_wins_over_parts() {
        let c = config(&[("DATABASE_URL", "postgres://u:p@db/app"), ("DB_HOST", "other")]).unwrap();
        assert_eq!(c.database_url, "postgres://u:p@db/app");
    }

    #[test]
    fn url_is_composed_from_parts() {
        let c = config(&[
            ("DB_USER", "api"),
            ("DB_PASSWORD", "secret"),
            ("DB_HOST", "db"),
            ("DB_PORT", "5433"),
            ("DB", "portfolio"),
        ])
        .unwrap();
        assert_eq!(c.database_url, "postgres://api:secret@db:5433/portfolio");
    }

    #[test]
    fn invalid_values_name_the_key() {
        let err = config(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for BIND_ADDR: 'nowhere'");
        assert!(config(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config(&[("CREATE_DATABASE", "maybe")]).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let c = config(&[("DB_MAX_CONNECTIONS", "  "), ("CREATE_DATABASE", "off")]).unwrap();
        assert_eq!(c.max_connections, 5);
        assert!(!c.create_database);
    }
}
