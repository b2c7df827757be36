//! The interception decision.
//!
//! # Responsibilities
//! - Resolve the request against the registry
//! - Produce the canned response (or simulated failure) of the selected stub
//! - Apply the passthrough policy when nothing matches

use std::sync::Arc;

use arc_swap::ArcSwap;
use bytes::Bytes;
use http::{header, HeaderMap, Method, Request};

use crate::config::schema::InterceptConfig;
use crate::intercept::body::payload_from_body;
use crate::intercept::types::{InterceptError, InterceptResult};
use crate::matching::{Payload, RequestKey};
use crate::observability::metrics;
use crate::registry::Registry;
use crate::response::{render, RenderedResponse, StubConnection};

/// Outcome of consulting the interceptor.
#[derive(Debug)]
pub enum Interception {
    /// A stub matched; return this instead of opening a socket.
    Respond(RenderedResponse),
    /// No stub matched and passthrough is allowed; perform the real call.
    Passthrough,
}

/// Decides, per outbound request, between a canned response and the network.
#[derive(Clone)]
pub struct Interceptor {
    registry: Arc<Registry>,
    config: Arc<ArcSwap<InterceptConfig>>,
}

impl Interceptor {
    pub fn new(registry: Arc<Registry>, config: InterceptConfig) -> Self {
        Self {
            registry,
            config: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn allow_net_connect(&self) -> bool {
        self.config.load().allow_net_connect
    }

    /// Flip the passthrough policy for every clone of this interceptor.
    pub fn set_allow_net_connect(&self, allow: bool) {
        self.config.rcu(|current| {
            let mut next = InterceptConfig::clone(current);
            next.allow_net_connect = allow;
            next
        });
        tracing::debug!(allow_net_connect = allow, "Passthrough policy changed");
    }

    /// Intercept a call described by method, target URI and payload.
    pub fn attempt_intercept(
        &self,
        method: &Method,
        uri: &str,
        payload: Option<Payload>,
    ) -> InterceptResult<Interception> {
        let key = RequestKey::new(method, uri, payload.as_ref())?;
        self.intercept(key, HeaderMap::new())
    }

    /// Intercept an `http::Request`, extracting its payload from the body.
    pub fn intercept_request(&self, request: &Request<Bytes>) -> InterceptResult<Interception> {
        let uri = absolute_uri(request)?;
        let payload = payload_from_body(request.headers(), request.body());
        let key = RequestKey::new(request.method(), &uri, payload.as_ref())?;
        self.intercept(key, request.headers().clone())
    }

    fn intercept(&self, key: RequestKey, headers: HeaderMap) -> InterceptResult<Interception> {
        let Some(stub) = self.registry.resolve_key(&key)? else {
            if self.allow_net_connect() {
                tracing::info!(method = %key.method, uri = %key.uri, "No stub registered, passing through");
                metrics::record_intercept("passthrough");
                return Ok(Interception::Passthrough);
            }
            tracing::warn!(method = %key.method, uri = %key.uri, "No stub registered, real connections disabled");
            metrics::record_intercept("denied");
            return Err(InterceptError::NoStubRegistered {
                method: key.method,
                uri: key.uri.to_string(),
                payload: key.payload,
            });
        };

        let connection = StubConnection {
            method: key.method,
            uri: key.uri,
            payload: key.payload,
            headers,
        };

        match stub.response.produce(&connection) {
            Ok(canned) => {
                metrics::record_intercept("stubbed");
                Ok(Interception::Respond(render(canned)))
            }
            Err(failure) => {
                tracing::debug!(uri = %connection.uri, failure = %failure, "Stub raised connection failure");
                metrics::record_intercept("raised");
                Err(InterceptError::ConnectionFailure(failure))
            }
        }
    }
}

/// The request target as an absolute URI, using the Host header for
/// origin-form targets.
fn absolute_uri(request: &Request<Bytes>) -> InterceptResult<String> {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return Ok(uri.to_string());
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| InterceptError::MissingHost(uri.to_string()))?;
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    Ok(format!("http://{}{}", host, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StubOptions;
    use crate::response::ConnectionFailure;
    use http::StatusCode;

    fn interceptor(allow: bool) -> Interceptor {
        Interceptor::new(Arc::new(Registry::new()), InterceptConfig { allow_net_connect: allow })
    }

    #[test]
    fn test_stubbed_response() {
        let interceptor = interceptor(false);
        interceptor
            .registry()
            .register(Method::GET, "http://example.com/", StubOptions::new().status(StatusCode::ACCEPTED).body("hi"))
            .unwrap();

        match interceptor.attempt_intercept(&Method::GET, "http://example.com/", None).unwrap() {
            Interception::Respond(rendered) => {
                assert_eq!(rendered.response.status(), StatusCode::ACCEPTED);
                assert_eq!(rendered.response.body(), &Bytes::from("hi"));
            }
            Interception::Passthrough => panic!("expected a stubbed response"),
        }
    }

    #[test]
    fn test_passthrough_policy() {
        let interceptor = interceptor(true);
        assert!(matches!(
            interceptor.attempt_intercept(&Method::GET, "http://example.com/", None),
            Ok(Interception::Passthrough)
        ));

        let clone = interceptor.clone();
        clone.set_allow_net_connect(false);
        assert!(!interceptor.allow_net_connect());
        let err = interceptor.attempt_intercept(&Method::GET, "example.com", None).unwrap_err();
        match err {
            InterceptError::NoStubRegistered { method, uri, payload } => {
                assert_eq!(method, Method::GET);
                assert_eq!(uri, "http://example.com/");
                assert!(payload.is_none());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_raise_is_an_error() {
        let interceptor = interceptor(false);
        interceptor
            .registry()
            .register(Method::GET, "http://example.com/", StubOptions::new().raises(ConnectionFailure::Reset))
            .unwrap();
        let err = interceptor.attempt_intercept(&Method::GET, "http://example.com/", None).unwrap_err();
        assert!(matches!(err, InterceptError::ConnectionFailure(ConnectionFailure::Reset)));
    }

    #[test]
    fn test_origin_form_request_uses_host_header() {
        let interceptor = interceptor(false);
        interceptor
            .registry()
            .register(Method::GET, "http://example.com/search?a=1&q=x", StubOptions::new().body("found"))
            .unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/search?q=x&a=1")
            .header(header::HOST, "example.com")
            .body(Bytes::new())
            .unwrap();
        assert!(matches!(
            interceptor.intercept_request(&request),
            Ok(Interception::Respond(_))
        ));

        let hostless = Request::builder().uri("/").body(Bytes::new()).unwrap();
        assert!(matches!(
            interceptor.intercept_request(&hostless),
            Err(InterceptError::MissingHost(_))
        ));
    }
}
