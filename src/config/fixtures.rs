//! Registering fixture entries into a registry.

use std::str::FromStr;
use std::time::Duration;

use http::{HeaderName, HeaderValue, StatusCode};

use crate::config::loader::ConfigError;
use crate::config::schema::{FixtureResponse, StubFixture, WebstubConfig};
use crate::matching::{IntoUriPattern, MethodMatcher, UriPattern};
use crate::registry::{Registry, RegistryResult, StubOptions};
use crate::response::ConnectionFailure;

pub(crate) fn fixture_method(fixture: &StubFixture) -> RegistryResult<MethodMatcher> {
    fixture.method.parse()
}

pub(crate) fn fixture_uri(fixture: &StubFixture) -> RegistryResult<UriPattern> {
    if fixture.pattern {
        UriPattern::regex(&fixture.uri)
    } else {
        fixture.uri.as_str().into_uri_pattern()
    }
}

/// Translate one fixture response into registration options.
pub(crate) fn fixture_options(response: &FixtureResponse) -> Result<StubOptions, String> {
    let mut options = StubOptions::new();

    if let Some(code) = response.status {
        let status = StatusCode::from_u16(code).map_err(|_| format!("invalid status code {}", code))?;
        options = options.status(status);
    }

    for (name, value) in &response.headers {
        let name = HeaderName::from_str(name).map_err(|_| format!("invalid header name {:?}", name))?;
        let value = HeaderValue::from_str(value).map_err(|_| format!("invalid value for header {}", name))?;
        options = options.header(name, value);
    }

    match (&response.body, &response.body_file) {
        (Some(_), Some(_)) => return Err("body and body_file are mutually exclusive".to_string()),
        (Some(body), None) => options = options.body(body.clone()),
        (None, Some(path)) => options = options.body_file(path.clone()),
        (None, None) => {}
    }

    if let Some(data) = &response.data {
        options = options.data(data.clone());
    }

    match (response.times, response.unlimited) {
        (Some(_), true) => return Err("times and unlimited are mutually exclusive".to_string()),
        (Some(times), false) => options = options.times(times),
        (None, true) => options = options.unlimited(),
        (None, false) => {}
    }

    if let Some(raises) = &response.raises {
        if response.body.is_some() || response.body_file.is_some() {
            return Err("raises cannot be combined with a body".to_string());
        }
        let failure = ConnectionFailure::from_str(raises).unwrap_or_else(|never| match never {});
        options = options.raises(failure);
    }

    if let Some(ms) = response.latency_ms {
        options = options.latency(Duration::from_millis(ms));
    }

    Ok(options)
}

/// Register every fixture of `config` into `registry`.
///
/// Returns the number of stubs registered.
pub fn install(config: &WebstubConfig, registry: &Registry) -> Result<usize, ConfigError> {
    let mut total = 0;
    for (index, fixture) in config.stubs.iter().enumerate() {
        let method = fixture_method(fixture)?;
        let uri = fixture_uri(fixture)?;
        let options = fixture
            .responses
            .iter()
            .map(fixture_options)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| ConfigError::Fixture { index, message })?;
        total += registry.register_all(method, uri, options)?;
    }

    tracing::info!(fixtures = config.stubs.len(), stubs = total, "Fixtures installed");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use http::Method;

    const FIXTURES: &str = r#"
        [[stubs]]
        method = "post"
        uri = "http://mock/"
        [[stubs.responses]]
        body = "foo"
        data = { a = 1, b = 1 }
        unlimited = true
        [[stubs.responses]]
        body = "baz"
        unlimited = true

        [[stubs]]
        uri = 'api\.example\.com/v\d+/'
        pattern = true
        [[stubs.responses]]
        status = 503
        headers = { retry-after = "5" }
    "#;

    #[test]
    fn test_install_fixtures() {
        let config = parse_config(FIXTURES).unwrap();
        let registry = Registry::new();
        assert_eq!(install(&config, &registry).unwrap(), 3);

        let foo = crate::Payload::structured([("a", 1), ("b", 1)]);
        let stub = registry.resolve(&Method::POST, "http://mock/", Some(&foo)).unwrap().unwrap();
        assert_eq!(stub.response.static_body().unwrap(), "foo");

        let stub = registry.resolve(&Method::POST, "http://mock/", None).unwrap().unwrap();
        assert_eq!(stub.response.static_body().unwrap(), "baz");

        let stub = registry
            .resolve(&Method::DELETE, "https://api.example.com/v2/items", None)
            .unwrap()
            .unwrap();
        match stub.response {
            crate::ResponseSpec::Static(response) => {
                assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(response.headers["retry-after"], "5");
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_options_conflicts() {
        let response = FixtureResponse {
            times: Some(2),
            unlimited: true,
            ..FixtureResponse::default()
        };
        assert!(fixture_options(&response).is_err());

        let response = FixtureResponse {
            body: Some("x".into()),
            raises: Some("refused".into()),
            ..FixtureResponse::default()
        };
        assert!(fixture_options(&response).is_err());
    }
}
