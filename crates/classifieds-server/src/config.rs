use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use tracing::warn;

use classifieds_api::state::SiteConfig;

/// Placeholder JWT secret used when none is configured.
const DEV_SECRET: &str = "dev-secret-change-me";

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub site: SiteConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("CLASSIFIEDS_HOST", "0.0.0.0");
        let port: u16 = var("CLASSIFIEDS_PORT", "3000")
            .parse()
            .context("CLASSIFIEDS_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("CLASSIFIEDS_HOST must be an IP address")?;

        let jwt_secret = var("CLASSIFIEDS_JWT_SECRET", DEV_SECRET);
        if jwt_secret == DEV_SECRET {
            warn!("CLASSIFIEDS_JWT_SECRET is unset; using the development placeholder");
        }

        let token_ttl_days: i64 = var("CLASSIFIEDS_TOKEN_TTL_DAYS", "30")
            .parse()
            .context("CLASSIFIEDS_TOKEN_TTL_DAYS must be a whole number of days")?;
        // Two weeks by default
        let session_ttl_secs: i64 = var("CLASSIFIEDS_SESSION_TTL_SECS", "1209600")
            .parse()
            .context("CLASSIFIEDS_SESSION_TTL_SECS must be a whole number of seconds")?;

        let installed = var("CLASSIFIEDS_INSTALLED", "ads,cats,hello,home")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            addr,
            db_path: var("CLASSIFIEDS_DB_PATH", "classifieds.db").into(),
            site: SiteConfig {
                jwt_secret,
                token_ttl: TimeDelta::days(token_ttl_days),
                session_ttl: TimeDelta::seconds(session_ttl_secs),
                installed,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.db_path, PathBuf::from("classifieds.db"));
        assert_eq!(config.site.token_ttl, TimeDelta::days(30));
        assert_eq!(config.site.session_ttl, TimeDelta::weeks(2));
        assert_eq!(config.site.installed, vec!["ads", "cats", "hello", "home"]);
    }

    #[test]
    fn overrides_and_bad_values() {
        let config = config(&[
            ("CLASSIFIEDS_PORT", "8080"),
            ("CLASSIFIEDS_INSTALLED", " ads , cats ,,"),
            ("CLASSIFIEDS_JWT_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.site.installed, vec!["ads", "cats"]);
        assert_eq!(config.site.jwt_secret, "s3cret");

        assert!(super::Config::from_lookup(|key| {
            (key == "CLASSIFIEDS_PORT").then(|| "not-a-port".to_string())
        })
        .is_err());
    }
}
