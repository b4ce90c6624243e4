//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

impl From<Vec<ValidationError>> for ConfigError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ConfigError::Validation(errors)
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
///
/// Returns whether the file was found so callers know whether there is
/// anything to watch.
pub fn load_or_default(path: &Path) -> Result<(GatewayConfig, bool), ConfigError> {
    if path.exists() {
        Ok((load_config(path)?, true))
    } else {
        let config = GatewayConfig::default();
        validate_config(&config)?;
        Ok((config, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.api.prefix, "/api/v1");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert!(config.cors.allow_credentials);
        assert!(config.groups.is_empty());
        assert!(config.dev.reload);
    }

    #[test]
    fn test_parse_groups() {
        let config = parse_config(
            r#"
            [api]
            prefix = "/api/v2"

            [observability]
            log_format = "json"

            [[groups]]
            name = "chat"
            upstream = "http://127.0.0.1:9001"
            routes = [
                { method = "POST", path = "/send" },
                { method = "GET", path = "/sessions" },
            ]

            [[groups]]
            name = "dashboard"
            tag = "dashboard"
            upstream = "http://127.0.0.1:9002"
            routes = [{ method = "GET", path = "/dashboard/stats" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.api.prefix, "/api/v2");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[0].mount, "chat");
        assert_eq!(config.groups[0].tag(), "chat");
        assert_eq!(config.groups[1].mount, "chat");
        assert_eq!(config.groups[1].routes[0].path, "/dashboard/stats");
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = parse_config("[api\nprefix = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_semantic_error_is_validation_error() {
        let err = parse_config(
            r#"
            [api]
            prefix = "/api/v1/"

            [cors]
            allowed_origins = ["*"]
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&ValidationError::WildcardWithCredentials));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let (config, found) =
            load_or_default(Path::new("/definitely/not/here/gateway.toml")).unwrap();
        assert!(!found);
        assert_eq!(config.api.welcome_message, "Bienvenue sur l'API du chatbot de L'Instant M");
    }
}
