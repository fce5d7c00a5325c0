//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use roulette::{
    GameSettings,
    constants::{CHAMBER_COUNT, DEFAULT_SKIPS_PER_PLAYER, MIN_PLAYERS},
    session::{BulletSource, RegistryConfig},
};
use std::net::SocketAddr;

const DEFAULT_BIND: SocketAddr = SocketAddr::V4(std::net::SocketAddrV4::new(
    std::net::Ipv4Addr::LOCALHOST,
    6969,
));

const DEFAULT_INBOX_CAPACITY: usize = 64;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus scrape endpoint, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Session registry and game rules
    pub registry: RegistryConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `seed_override` - Optional bullet seed override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), bind_override, seed_override)
    }

    /// Same as [`ServerConfig::from_env`] but reading variables through
    /// `lookup`, so callers can supply their own source.
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_or(&lookup, "SERVER_BIND", DEFAULT_BIND)?,
        };

        let metrics_bind = parse_env_opt(&lookup, "METRICS_BIND")?;

        let game = GameSettings::new(
            parse_env_or(&lookup, "ROULETTE_CHAMBERS", CHAMBER_COUNT)?,
            parse_env_or(&lookup, "ROULETTE_SKIPS_PER_PLAYER", DEFAULT_SKIPS_PER_PLAYER)?,
            parse_env_or(&lookup, "ROULETTE_MIN_PLAYERS", MIN_PLAYERS)?,
        );

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => parse_env_opt(&lookup, "ROULETTE_SEED")?,
        };
        let bullets = seed.map_or(BulletSource::Random, BulletSource::Seeded);

        let registry = RegistryConfig {
            game,
            bullets,
            inbox_capacity: parse_env_or(&lookup, "SESSION_INBOX_CAPACITY", DEFAULT_INBOX_CAPACITY)?,
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            registry,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.registry.game;

        if game.chambers < 2 {
            return Err(ConfigError::Invalid {
                var: "ROULETTE_CHAMBERS".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if game.min_players < 2 {
            return Err(ConfigError::Invalid {
                var: "ROULETTE_MIN_PLAYERS".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if self.registry.inbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "SESSION_INBOX_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        self.registry
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "ROULETTE_*".to_string(),
                reason,
            })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
///
/// An unset or empty variable yields the default; a set but unparseable one
/// is an error rather than being silently ignored.
fn parse_env_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_env_opt(lookup, key)?.unwrap_or(default))
}

fn parse_env_opt<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned(), None, None)
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:6969".parse().unwrap());
        assert_eq!(config.metrics_bind, None);
        assert_eq!(config.registry.game, GameSettings::default());
        assert_eq!(config.registry.bullets, BulletSource::Random);
        assert_eq!(config.registry.inbox_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = load(&[
            ("SERVER_BIND", "0.0.0.0:8080"),
            ("METRICS_BIND", "0.0.0.0:9090"),
            ("ROULETTE_CHAMBERS", "8"),
            ("ROULETTE_SKIPS_PER_PLAYER", "1"),
            ("ROULETTE_MIN_PLAYERS", "3"),
            ("ROULETTE_SEED", "99"),
            ("SESSION_INBOX_CAPACITY", "16"),
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.metrics_bind, Some("0.0.0.0:9090".parse().unwrap()));
        assert_eq!(config.registry.game, GameSettings::new(8, 1, 3));
        assert_eq!(config.registry.bullets, BulletSource::Seeded(99));
        assert_eq!(config.registry.inbox_capacity, 16);
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let config = ServerConfig::from_lookup(
            |key| (key == "ROULETTE_SEED").then(|| "1".to_string()),
            Some("127.0.0.1:7000".parse().unwrap()),
            Some(7),
        )
        .unwrap();

        assert_eq!(config.bind.port(), 7000);
        assert_eq!(config.registry.bullets, BulletSource::Seeded(7));
    }

    #[test]
    fn test_unparseable_variable_is_an_error() {
        let err = load(&[("ROULETTE_CHAMBERS", "six")]).unwrap_err();
        let ConfigError::Invalid { var, .. } = err;
        assert_eq!(var, "ROULETTE_CHAMBERS");
    }

    #[test]
    fn test_empty_variable_uses_default() {
        let config = load(&[("METRICS_BIND", "  ")]).unwrap();
        assert_eq!(config.metrics_bind, None);
    }

    #[test]
    fn test_validation_rejects_single_chamber() {
        let config = load(&[("ROULETTE_CHAMBERS", "1")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ROULETTE_CHAMBERS"));
    }

    #[test]
    fn test_validation_rejects_zero_inbox() {
        let config = load(&[("SESSION_INBOX_CAPACITY", "0")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { var, .. }) if var == "SESSION_INBOX_CAPACITY"
        ));
    }

    #[test]
    fn test_validation_rejects_shared_metrics_port() {
        let config = load(&[
            ("SERVER_BIND", "127.0.0.1:8080"),
            ("METRICS_BIND", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
