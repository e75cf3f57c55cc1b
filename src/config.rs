use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::db::models::requests::DecisionPolicy;

/// Placeholder used when `ADMIN_TOKEN` is not set. Insecure; startup warns about it.
pub const DEFAULT_ADMIN_TOKEN: &str = "changeme";
pub const DEFAULT_PORT: u16 = 10000;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub admin_token: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    pub decision_policy: DecisionPolicy,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let admin_token = lookup("ADMIN_TOKEN")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_TOKEN.to_string());

        let host = match lookup("HOST") {
            Some(h) => h.parse::<IpAddr>().with_context(|| format!("HOST '{h}' is not an IP address"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = match lookup("PORT") {
            Some(p) => p.parse::<u16>().with_context(|| format!("PORT '{p}' is not a valid port"))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(n) => n
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS '{n}' is not a number"))?,
            None => 10,
        };

        let decision_policy = match lookup("DECISION_POLICY") {
            Some(p) => p.parse::<DecisionPolicy>().map_err(|e| anyhow!(e))?,
            None => DecisionPolicy::default(),
        };

        Ok(Self {
            database_url,
            admin_token,
            host,
            port,
            max_connections,
            decision_policy,
            log_dir: lookup("LOG_DIR").filter(|d| !d.is_empty()).map(PathBuf::from),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn uses_default_admin_token(&self) -> bool {
        self.admin_token == DEFAULT_ADMIN_TOKEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/desk")]).unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.admin_token, "changeme");
        assert!(config.uses_default_admin_token());
        assert_eq!(config.decision_policy, DecisionPolicy::Final);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:10000");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn database_url_is_required() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/desk"),
            ("ADMIN_TOKEN", "s3cret"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("DECISION_POLICY", "overwrite"),
            ("LOG_DIR", "logs"),
        ])
        .unwrap();
        assert_eq!(config.admin_token, "s3cret");
        assert!(!config.uses_default_admin_token());
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.decision_policy, DecisionPolicy::Overwrite);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(config_from(&[("DATABASE_URL", "x"), ("PORT", "ninety")]).is_err());
    }
}
