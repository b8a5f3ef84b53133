//! Engine configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MONSTER_AI_INTERVAL_MS: u64 = 5000;

/// Runtime configuration for the engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Root containing `rules/`, `campaigns/` and `dialogues/`.
    pub data_dir: PathBuf,
    /// Period of each monster's attack task.
    pub monster_ai_interval: Duration,
    /// Raw `CORS_ALLOWED_ORIGINS` value, `None` when unset or blank.
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            monster_ai_interval: Duration::from_millis(DEFAULT_MONSTER_AI_INTERVAL_MS),
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparsable numbers fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let server_port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .map(|raw| parse_or_default("SERVER_PORT", &raw, DEFAULT_PORT))
            .unwrap_or(DEFAULT_PORT);

        let data_dir = lookup("TAVERN_DATA_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let interval_ms = lookup("MONSTER_AI_INTERVAL_MS")
            .map(|raw| {
                parse_or_default("MONSTER_AI_INTERVAL_MS", &raw, DEFAULT_MONSTER_AI_INTERVAL_MS)
            })
            .unwrap_or(DEFAULT_MONSTER_AI_INTERVAL_MS);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            server_host,
            server_port,
            data_dir,
            // A zero period would spin; clamp to 1ms.
            monster_ai_interval: Duration::from_millis(interval_ms.max(1)),
            cors_allowed_origins,
        }
    }
}

fn parse_or_default<T>(key: &str, raw: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, default = %default, "Invalid numeric setting, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.monster_ai_interval, Duration::from_secs(5));
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        let config = EngineConfig::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert_eq!(config.server_port, 8080);

        let config =
            EngineConfig::from_lookup(lookup_from(&[("PORT", "8080"), ("SERVER_PORT", "9000")]));
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SERVER_PORT", "not-a-port"),
            ("MONSTER_AI_INTERVAL_MS", "soon"),
        ]));
        assert_eq!(config.server_port, DEFAULT_PORT);
        assert_eq!(
            config.monster_ai_interval,
            Duration::from_millis(DEFAULT_MONSTER_AI_INTERVAL_MS)
        );
    }

    #[test]
    fn blank_cors_origins_are_treated_as_unset() {
        let config = EngineConfig::from_lookup(lookup_from(&[("CORS_ALLOWED_ORIGINS", "  ")]));
        assert!(config.cors_allowed_origins.is_none());

        let config = EngineConfig::from_lookup(lookup_from(&[
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173"),
            ("TAVERN_DATA_DIR", "/srv/tavern"),
        ]));
        assert_eq!(
            config.cors_allowed_origins.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(config.data_dir, PathBuf::from("/srv/tavern"));
    }
}
