use std::time::Duration;

use anyhow::{Context, Result};

use botdash_api::FaultPolicy;

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL the keep-alive task calls back into.
    pub public_url: String,
    pub keepalive_interval: Duration,
    pub stats_interval: Duration,
    /// Platform gateway endpoint; `None` keeps the chat client offline.
    pub gateway_url: Option<String>,
    pub guild_count: u64,
    pub fault_policy: FaultPolicy,
    pub seed: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = get("BOTDASH_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&get, "BOTDASH_PORT", 5000)?;
        let public_url = get("BOTDASH_PUBLIC_URL")
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", port))
            .trim_end_matches('/')
            .to_string();
        let keepalive_secs: u64 = parse_or(&get, "BOTDASH_KEEPALIVE_SECS", 600)?;
        let stats_secs: u64 = parse_or(&get, "BOTDASH_STATS_INTERVAL_SECS", 60)?;
        let gateway_url = get("BOTDASH_GATEWAY_URL").filter(|v| !v.trim().is_empty());
        let guild_count: u64 = parse_or(&get, "BOTDASH_GUILD_COUNT", 0)?;
        let fault_policy = match get("BOTDASH_FAULT_POLICY") {
            Some(v) => v.parse()?,
            None => FaultPolicy::default(),
        };
        let seed: bool = parse_or(&get, "BOTDASH_SEED", true)?;

        if keepalive_secs == 0 || stats_secs == 0 {
            anyhow::bail!("Task intervals must be at least one second");
        }

        Ok(Self {
            host,
            port,
            public_url,
            keepalive_interval: Duration::from_secs(keepalive_secs),
            stats_interval: Duration::from_secs(stats_secs),
            gateway_url,
            guild_count,
            fault_policy,
            seed,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
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
        let c = config(&[]).unwrap();
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 5000);
        assert_eq!(c.public_url, "http://127.0.0.1:5000");
        assert_eq!(c.keepalive_interval, Duration::from_secs(600));
        assert_eq!(c.stats_interval, Duration::from_secs(60));
        assert_eq!(c.gateway_url, None);
        assert_eq!(c.fault_policy, FaultPolicy::Continue);
        assert!(c.seed);
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("BOTDASH_PORT", "8080"),
            ("BOTDASH_PUBLIC_URL", "https://dash.example.org/"),
            ("BOTDASH_GATEWAY_URL", "https://gateway.example.org"),
            ("BOTDASH_GUILD_COUNT", "14"),
            ("BOTDASH_FAULT_POLICY", "unhealthy"),
            ("BOTDASH_SEED", "false"),
        ])
        .unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.public_url, "https://dash.example.org");
        assert_eq!(c.gateway_url.as_deref(), Some("https://gateway.example.org"));
        assert_eq!(c.guild_count, 14);
        assert_eq!(c.fault_policy, FaultPolicy::Unhealthy);
        assert!(!c.seed);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("BOTDASH_PORT", "http")]).is_err());
        assert!(config(&[("BOTDASH_FAULT_POLICY", "explode")]).is_err());
        assert!(config(&[("BOTDASH_KEEPALIVE_SECS", "0")]).is_err());
    }
}
