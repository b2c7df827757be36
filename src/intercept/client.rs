//! Async client routed through the interceptor.
//!
//! # Responsibilities
//! - Consult the interceptor before every request
//! - Simulate stub latency
//! - Hand unmatched requests to a real transport when passthrough is allowed

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{Request, Response};

use crate::intercept::interceptor::{Interception, Interceptor};
use crate::intercept::types::{BoxError, InterceptError, InterceptResult};
use crate::response::ConnectionFailure;

/// The real network side of a client.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>, BoxError>>;
}

/// Transport that refuses every connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNetwork;

impl Transport for NoNetwork {
    fn send(&self, _request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>, BoxError>> {
        Box::pin(async { Err(Box::new(ConnectionFailure::Refused) as BoxError) })
    }
}

/// HTTP client that answers from the registry first.
pub struct StubClient<T> {
    interceptor: Interceptor,
    transport: T,
}

impl<T: Transport> StubClient<T> {
    pub fn new(interceptor: Interceptor, transport: T) -> Self {
        Self {
            interceptor,
            transport,
        }
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request, returning the canned response when a stub matches.
    pub async fn send(&self, request: Request<Bytes>) -> InterceptResult<Response<Bytes>> {
        match self.interceptor.intercept_request(&request)? {
            Interception::Respond(rendered) => {
                if let Some(latency) = rendered.latency {
                    tokio::time::sleep(latency).await;
                }
                Ok(rendered.response)
            }
            Interception::Passthrough => {
                tracing::debug!(method = %request.method(), uri = %request.uri(), "Forwarding to transport");
                self.transport
                    .send(request)
                    .await
                    .map_err(InterceptError::Transport)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::InterceptConfig;
    use crate::registry::{Registry, StubOptions};
    use http::Method;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn client(allow: bool) -> StubClient<NoNetwork> {
        let interceptor = Interceptor::new(Arc::new(Registry::new()), InterceptConfig { allow_net_connect: allow });
        StubClient::new(interceptor, NoNetwork)
    }

    fn get(uri: &str) -> Request<Bytes> {
        Request::builder().method(Method::GET).uri(uri).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_latency_is_simulated() {
        let client = client(false);
        client
            .interceptor()
            .registry()
            .register(
                Method::GET,
                "http://example.com/slow",
                StubOptions::new().body("late").latency(Duration::from_millis(30)),
            )
            .unwrap();

        let started = Instant::now();
        let response = client.send(get("http://example.com/slow")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(response.body(), &Bytes::from("late"));
    }

    #[tokio::test]
    async fn test_passthrough_reaches_transport() {
        let client = client(true);
        let err = client.send(get("http://example.com/")).await.unwrap_err();
        assert!(matches!(err, InterceptError::Transport(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
