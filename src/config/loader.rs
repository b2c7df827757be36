//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::WebstubConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::registry::RegistryError;

/// Error type for configuration loading and installation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("stubs[{index}]: {message}")]
    Fixture { index: usize, message: String },

    #[error("Registration failed: {0}")]
    Registry(#[from] RegistryError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<WebstubConfig, ConfigError> {
    let config: WebstubConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
///
/// Relative `body_file` paths are resolved against the file's directory.
pub fn load_config(path: &Path) -> Result<WebstubConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: WebstubConfig = toml::from_str(&content)?;

    if let Some(base) = path.parent() {
        for response in config.stubs.iter_mut().flat_map(|s| s.responses.iter_mut()) {
            if let Some(file) = response.body_file.as_mut() {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.intercept.allow_net_connect);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.stubs.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[intercept\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_resolves_relative_body_file() {
        let dir = std::env::temp_dir().join(format!("webstub-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("body.json"), r#"{"ok":true}"#).unwrap();
        let path = dir.join("fixtures.toml");
        fs::write(
            &path,
            r#"
            [intercept]
            allow_net_connect = false

            [[stubs]]
            method = "get"
            uri = "example.com/status"
            [[stubs.responses]]
            body_file = "body.json"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.intercept.allow_net_connect);
        assert_eq!(
            config.stubs[0].responses[0].body_file.as_deref(),
            Some(dir.join("body.json").as_path())
        );

        // Cleanup
        fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_validation_errors_joined() {
        let err = parse_config(
            r#"
            [[stubs]]
            method = "no such method"
            uri = "http://[::1/"
            responses = []
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
