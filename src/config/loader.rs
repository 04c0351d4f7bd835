//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env(e) => write!(f, "Environment error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// Layered: the TOML file (when given) is the base, environment variables
/// override it, and validation runs on the final shape.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config: ProxyConfig = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ProxyConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the supported environment overrides (`HOST`, `PORT`,
/// `CORS_ALLOW_ORIGIN`).
fn apply_env(
    config: &mut ProxyConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(host) = var("HOST") {
        config.server.host = host;
    }
    if let Some(port) = var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| ConfigError::Env(format!("PORT is not a port number: '{port}'")))?;
    }
    if let Some(origin) = var("CORS_ALLOW_ORIGIN") {
        config.cors.allow_origin = Some(origin);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_full_file() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 4000

            [cors]
            allow_origin = "https://player.example"

            [upstream]
            base_url = "https://music.example.com"
            timeout_secs = 5

            [route_overrides]
            "album_new.js" = "/albums/latest"

            [observability]
            log_level = "debug"
            metrics_enabled = false
        "#;

        let config: ProxyConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.cors.allow_origin.as_deref(), Some("https://player.example"));
        assert_eq!(config.upstream.base_url, "https://music.example.com");
        assert_eq!(config.route_overrides["album_new.js"], "/albums/latest");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ProxyConfig = toml::from_str("[server]\nport = 8080\n").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.base_url, "https://music.163.com");
        assert_eq!(config.server.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ProxyConfig::default();
        apply_env(
            &mut config,
            env(&[("HOST", "10.1.2.3"), ("PORT", "9000"), ("CORS_ALLOW_ORIGIN", "*")]),
        )
        .unwrap();

        assert_eq!(config.server.host, "10.1.2.3");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.cors.allow_origin.as_deref(), Some("*"));
    }

    #[test]
    fn test_env_port_must_be_numeric() {
        let mut config = ProxyConfig::default();
        let result = apply_env(&mut config, env(&[("PORT", "not-a-port")]));

        assert!(matches!(result, Err(ConfigError::Env(_))));
    }

    #[test]
    fn test_absent_env_leaves_config_alone() {
        let mut config = ProxyConfig::default();
        apply_env(&mut config, env(&[])).unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.cors.allow_origin.is_none());
    }
}
