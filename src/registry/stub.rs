//! Stubs and the option sets they are registered from.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::matching::{MethodMatcher, Payload, UriPattern};
use crate::registry::types::{RegistryError, RegistryResult};
use crate::response::{ConnectionFailure, ResponseCallback, ResponseSpec, StaticResponse, StubConnection};

/// How many more times a stub may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Unlimited,
    Remaining(u32),
}

impl Default for Times {
    /// One use, so consecutive stubs in a sequence rotate.
    fn default() -> Self {
        Times::Remaining(1)
    }
}

impl Times {
    pub fn has_uses(&self) -> bool {
        match self {
            Times::Unlimited => true,
            Times::Remaining(n) => *n > 0,
        }
    }

    fn consume(&mut self) {
        if let Times::Remaining(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// A declared request shape bound to a canned response.
#[derive(Debug, Clone)]
pub struct Stub {
    pub method: MethodMatcher,
    pub uri: UriPattern,
    pub payload: Option<Payload>,
    pub response: ResponseSpec,
    pub times: Times,
}

impl Stub {
    /// Select this stub once, spending a use if it has a finite count.
    pub(crate) fn take(&mut self) -> Stub {
        if self.times.has_uses() {
            self.times.consume();
        }
        self.clone()
    }
}

/// Pick from a sequence: the first stub with uses left, else the last one.
pub(crate) fn select(sequence: &mut [Stub]) -> Option<Stub> {
    let index = sequence
        .iter()
        .position(|stub| stub.times.has_uses())
        .or_else(|| sequence.len().checked_sub(1))?;
    Some(sequence[index].take())
}

#[derive(Debug, Clone)]
enum BodySource {
    Inline(Bytes),
    File(PathBuf),
}

/// One registration option set.
///
/// ```
/// use webstub::StubOptions;
/// use http::StatusCode;
///
/// let options = StubOptions::new()
///     .status(StatusCode::CREATED)
///     .body("created")
///     .data([("name", "widget")])
///     .times(2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubOptions {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<BodySource>,
    callback: Option<ResponseCallback>,
    data: Option<Payload>,
    times: Option<Times>,
    raises: Option<ConnectionFailure>,
    latency: Option<Duration>,
}

impl StubOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(BodySource::Inline(body.into()));
        self
    }

    /// Respond with the contents of a file, read at registration time.
    pub fn body_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.body = Some(BodySource::File(path.into()));
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&StubConnection) -> Result<StaticResponse, ConnectionFailure> + Send + Sync + 'static,
    {
        self.callback = Some(ResponseCallback::new(f));
        self
    }

    /// Only match requests carrying this payload.
    ///
    /// Accepts anything convertible into a [`Payload`]: key/value pairs,
    /// a JSON object, or a literal string/bytes body.
    pub fn data(mut self, payload: impl IntoPayload) -> Self {
        self.data = Some(payload.into_payload());
        self
    }

    pub fn times(mut self, times: u32) -> Self {
        self.times = Some(Times::Remaining(times));
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.times = Some(Times::Unlimited);
        self
    }

    /// Fail the call with a connection-level error instead of responding.
    pub fn raises(mut self, failure: ConnectionFailure) -> Self {
        self.raises = Some(failure);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Validate the options and build the stub.
    pub(crate) fn build(self, method: &MethodMatcher, uri: &UriPattern) -> RegistryResult<Stub> {
        let times = self.times.unwrap_or_default();
        if let Times::Remaining(0) = times {
            return Err(RegistryError::InvalidTimes(0));
        }

        let response = match (self.callback, self.raises) {
            (Some(_), _) if self.body.is_some() || self.status.is_some() || !self.headers.is_empty() => {
                return Err(RegistryError::ConflictingResponse(format!("{} {}", method, uri)));
            }
            (Some(_), Some(_)) => {
                return Err(RegistryError::ConflictingResponse(format!("{} {}", method, uri)));
            }
            (Some(callback), None) => ResponseSpec::Callback(callback),
            (None, Some(failure)) => ResponseSpec::Raise(failure),
            (None, None) => {
                let body = match self.body {
                    Some(BodySource::Inline(bytes)) => bytes,
                    Some(BodySource::File(path)) => match fs::read(&path) {
                        Ok(contents) => Bytes::from(contents),
                        Err(source) => return Err(RegistryError::BodyFile { path, source }),
                    },
                    None => Bytes::new(),
                };
                ResponseSpec::Static(StaticResponse {
                    status: self.status.unwrap_or(StatusCode::OK),
                    headers: self.headers,
                    body,
                    latency: self.latency,
                })
            }
        };

        Ok(Stub {
            method: method.clone(),
            uri: uri.clone(),
            payload: self.data,
            response,
            times,
        })
    }
}

/// Conversion used by [`StubOptions::data`].
pub trait IntoPayload {
    fn into_payload(self) -> Payload;
}

impl IntoPayload for Payload {
    fn into_payload(self) -> Payload {
        self
    }
}

impl IntoPayload for &str {
    fn into_payload(self) -> Payload {
        Payload::from(self)
    }
}

impl IntoPayload for String {
    fn into_payload(self) -> Payload {
        Payload::from(self)
    }
}

impl IntoPayload for serde_json::Value {
    fn into_payload(self) -> Payload {
        Payload::from(self)
    }
}

impl<K, V, const N: usize> IntoPayload for [(K, V); N]
where
    K: std::fmt::Display,
    V: Into<crate::matching::PayloadValue>,
{
    fn into_payload(self) -> Payload {
        Payload::structured(self)
    }
}

impl<K, V> IntoPayload for Vec<(K, V)>
where
    K: std::fmt::Display,
    V: Into<crate::matching::PayloadValue>,
{
    fn into_payload(self) -> Payload {
        Payload::structured(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::IntoUriPattern;

    fn uri() -> UriPattern {
        "http://example.com/".into_uri_pattern().unwrap()
    }

    fn stub(body: &str, times: Times) -> Stub {
        Stub {
            method: MethodMatcher::Any,
            uri: uri(),
            payload: None,
            response: ResponseSpec::Static(StaticResponse::new(StatusCode::OK, body.to_string())),
            times,
        }
    }

    fn body_of(stub: &Stub) -> &[u8] {
        stub.response.static_body().unwrap()
    }

    #[test]
    fn test_select_consumes_in_order() {
        let mut seq = vec![stub("a", Times::Remaining(2)), stub("b", Times::Remaining(1))];
        assert_eq!(body_of(&select(&mut seq).unwrap()), b"a");
        assert_eq!(body_of(&select(&mut seq).unwrap()), b"a");
        assert_eq!(body_of(&select(&mut seq).unwrap()), b"b");
        // Exhausted: the last stub keeps answering.
        assert_eq!(body_of(&select(&mut seq).unwrap()), b"b");
        assert_eq!(seq[1].times, Times::Remaining(0));
    }

    #[test]
    fn test_select_unlimited_never_consumed() {
        let mut seq = vec![stub("a", Times::Unlimited), stub("b", Times::Remaining(1))];
        for _ in 0..5 {
            assert_eq!(body_of(&select(&mut seq).unwrap()), b"a");
        }
        assert_eq!(seq[1].times, Times::Remaining(1));
    }

    #[test]
    fn test_select_empty_sequence() {
        assert!(select(&mut []).is_none());
    }

    #[test]
    fn test_zero_times_rejected() {
        let err = StubOptions::new().times(0).build(&MethodMatcher::Any, &uri()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTimes(0)));
    }

    #[test]
    fn test_callback_conflicts_with_body() {
        let err = StubOptions::new()
            .body("x")
            .callback(|_| Ok(StaticResponse::default()))
            .build(&MethodMatcher::Any, &uri())
            .unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingResponse(_)));
    }

    #[test]
    fn test_missing_body_file_rejected() {
        let err = StubOptions::new()
            .body_file("/definitely/not/here.txt")
            .build(&MethodMatcher::Any, &uri())
            .unwrap_err();
        assert!(matches!(err, RegistryError::BodyFile { .. }));
    }

    #[test]
    fn test_default_static_response() {
        let stub = StubOptions::new().build(&MethodMatcher::Any, &uri()).unwrap();
        assert_eq!(stub.times, Times::Remaining(1));
        match stub.response {
            ResponseSpec::Static(response) => {
                assert_eq!(response.status, StatusCode::OK);
                assert!(response.body.is_empty());
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_raises_builds_raise_spec() {
        let stub = StubOptions::new()
            .raises(ConnectionFailure::TimedOut)
            .build(&MethodMatcher::Any, &uri())
            .unwrap();
        assert!(matches!(stub.response, ResponseSpec::Raise(ConnectionFailure::TimedOut)));
    }
}
