//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check methods, URIs and patterns parse
//! - Check each response builds into a stub (times > 0, no conflicting options, body files readable)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WebstubConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::fixtures::{fixture_method, fixture_options, fixture_uri};
use crate::config::schema::WebstubConfig;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct ValidationError {
    pub location: String,
    pub message: String,
}

impl ValidationError {
    fn new(location: impl Into<String>, message: impl ToString) -> Self {
        Self {
            location: location.into(),
            message: message.to_string(),
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &WebstubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown log level {:?}", config.observability.log_level),
        ));
    }

    for (i, fixture) in config.stubs.iter().enumerate() {
        let location = format!("stubs[{}]", i);

        let method = fixture_method(fixture)
            .map_err(|e| errors.push(ValidationError::new(format!("{}.method", location), e)))
            .ok();
        let uri = fixture_uri(fixture)
            .map_err(|e| errors.push(ValidationError::new(format!("{}.uri", location), e)))
            .ok();

        if fixture.responses.is_empty() {
            errors.push(ValidationError::new(
                format!("{}.responses", location),
                "at least one response is required",
            ));
        }

        for (j, response) in fixture.responses.iter().enumerate() {
            let location = format!("{}.responses[{}]", location, j);
            match fixture_options(response) {
                Ok(options) => {
                    if let (Some(method), Some(uri)) = (&method, &uri) {
                        if let Err(e) = options.build(method, uri) {
                            errors.push(ValidationError::new(location, e));
                        }
                    }
                }
                Err(message) => errors.push(ValidationError::new(location, message)),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FixtureResponse, StubFixture};

    fn fixture(responses: Vec<FixtureResponse>) -> StubFixture {
        StubFixture {
            method: "get".into(),
            uri: "http://example.com/".into(),
            pattern: false,
            responses,
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = WebstubConfig::default();
        config.stubs.push(fixture(vec![FixtureResponse::default()]));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = WebstubConfig::default();
        config.observability.log_level = "loud".into();
        config.stubs.push(fixture(vec![
            FixtureResponse {
                times: Some(0),
                ..FixtureResponse::default()
            },
            FixtureResponse {
                status: Some(1000),
                ..FixtureResponse::default()
            },
        ]));
        let mut bad_pattern = fixture(vec![FixtureResponse::default()]);
        bad_pattern.pattern = true;
        bad_pattern.uri = "(".into();
        config.stubs.push(bad_pattern);

        let errors = validate_config(&config).unwrap_err();
        let locations: Vec<&str> = errors.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(
            locations,
            vec![
                "observability.log_level",
                "stubs[0].responses[0]",
                "stubs[0].responses[1]",
                "stubs[1].uri",
            ]
        );
    }
}
