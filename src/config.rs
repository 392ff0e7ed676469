//! Runtime configuration, read from the environment (and `.env` when present).

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub nats_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 10,
        };
        let port = match get("PORT") {
            Some(v) => v.parse().context("PORT must be a valid port number")?,
            None => 8083,
        };
        let nats_url = get("NATS_URL").filter(|v| !v.is_empty());
        Ok(Self { database_url, database_max_connections, port, nats_url })
    }

    pub fn bind_addr(&self) -> String { format!("0.0.0.0:{}", self.port) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/market")])).unwrap();
        assert_eq!(cfg.port, 8083);
        assert_eq!(cfg.database_max_connections, 10);
        assert!(cfg.nats_url.is_none());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8083");
    }

    #[test]
    fn test_overrides_and_errors() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db"), ("PORT", "9000"), ("NATS_URL", "nats://bus:4222")])).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.nats_url.as_deref(), Some("nats://bus:4222"));
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("PORT", "http")])).is_err());
    }
}
