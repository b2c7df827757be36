//! Response specifications attached to stubs.

use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use thiserror::Error;

use crate::matching::{NormalizedUri, Payload};

/// Fixed response attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Delay applied before the response is handed back.
    pub latency: Option<Duration>,
}

impl Default for StaticResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            latency: None,
        }
    }
}

impl StaticResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            ..Self::default()
        }
    }
}

/// A connection-level failure raised instead of responding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionFailure {
    #[error("connection refused")]
    Refused,
    #[error("connection reset by peer")]
    Reset,
    #[error("connection timed out")]
    TimedOut,
    #[error("{0}")]
    Other(String),
}

impl ConnectionFailure {
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            ConnectionFailure::Refused => io::ErrorKind::ConnectionRefused,
            ConnectionFailure::Reset => io::ErrorKind::ConnectionReset,
            ConnectionFailure::TimedOut => io::ErrorKind::TimedOut,
            ConnectionFailure::Other(_) => io::ErrorKind::Other,
        }
    }

    pub fn into_io_error(self) -> io::Error {
        io::Error::new(self.kind(), self)
    }
}

impl FromStr for ConnectionFailure {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "refused" => ConnectionFailure::Refused,
            "reset" => ConnectionFailure::Reset,
            "timed_out" | "timeout" => ConnectionFailure::TimedOut,
            other => ConnectionFailure::Other(other.to_string()),
        })
    }
}

/// Handle to the simulated connection, passed to response callbacks.
#[derive(Debug, Clone)]
pub struct StubConnection {
    pub method: Method,
    pub uri: NormalizedUri,
    pub payload: Option<Payload>,
    pub headers: HeaderMap,
}

type CallbackFn = dyn Fn(&StubConnection) -> Result<StaticResponse, ConnectionFailure> + Send + Sync;

/// A response computed per call.
#[derive(Clone)]
pub struct ResponseCallback(Arc<CallbackFn>);

impl ResponseCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&StubConnection) -> Result<StaticResponse, ConnectionFailure> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, connection: &StubConnection) -> Result<StaticResponse, ConnectionFailure> {
        (self.0)(connection)
    }
}

impl fmt::Debug for ResponseCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseCallback(..)")
    }
}

/// How a stub produces its response.
#[derive(Debug, Clone)]
pub enum ResponseSpec {
    Static(StaticResponse),
    Raise(ConnectionFailure),
    Callback(ResponseCallback),
}

impl ResponseSpec {
    /// Produce the response for one call.
    pub fn produce(&self, connection: &StubConnection) -> Result<StaticResponse, ConnectionFailure> {
        match self {
            ResponseSpec::Static(response) => Ok(response.clone()),
            ResponseSpec::Raise(failure) => Err(failure.clone()),
            ResponseSpec::Callback(callback) => callback.call(connection),
        }
    }

    /// Body of a static response, if this is one.
    pub fn static_body(&self) -> Option<&Bytes> {
        match self {
            ResponseSpec::Static(response) => Some(&response.body),
            _ => None,
        }
    }
}
