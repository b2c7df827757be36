//! Interception error definitions.

use http::Method;
use thiserror::Error;

use crate::matching::Payload;
use crate::registry::RegistryError;
use crate::response::ConnectionFailure;

/// Boxed error returned by transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced to the caller of an intercepted request.
#[derive(Debug, Error)]
pub enum InterceptError {
    /// No stub matched and real connections are disabled.
    #[error("Real HTTP connections are disabled. Unregistered request: {}", describe_request(.method, .uri, .payload.as_ref()))]
    NoStubRegistered {
        method: Method,
        uri: String,
        payload: Option<Payload>,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The stub declared a connection-level failure.
    #[error("Simulated connection failure: {0}")]
    ConnectionFailure(#[from] ConnectionFailure),

    #[error("Request URI {0:?} has no host and no Host header")]
    MissingHost(String),

    #[error("Transport error: {0}")]
    Transport(BoxError),
}

/// Result type for interception.
pub type InterceptResult<T> = Result<T, InterceptError>;

fn describe_request(method: &Method, uri: &str, payload: Option<&Payload>) -> String {
    match payload {
        Some(payload) => format!("{} {} (with {})", method, uri, payload),
        None if *method == Method::POST || *method == Method::PUT => {
            format!("{} {} (with no payload)", method, uri)
        }
        None => format!("{} {}", method, uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_stub_message() {
        let err = InterceptError::NoStubRegistered {
            method: Method::GET,
            uri: "http://example.com/".into(),
            payload: None,
        };
        assert_eq!(
            err.to_string(),
            "Real HTTP connections are disabled. Unregistered request: GET http://example.com/"
        );

        let err = InterceptError::NoStubRegistered {
            method: Method::PUT,
            uri: "http://example.com/".into(),
            payload: Some(Payload::structured([("c", 1)])),
        };
        assert!(err.to_string().ends_with(r#"PUT http://example.com/ (with {"c":1})"#));
    }
}
