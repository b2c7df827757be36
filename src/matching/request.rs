//! Normalized view of an incoming request.

use http::Method;

use crate::matching::payload::Payload;
use crate::matching::uri::NormalizedUri;
use crate::registry::types::RegistryResult;

/// The (method, URI, payload) triple a lookup is performed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    pub method: Method,
    pub uri: NormalizedUri,
    pub payload: Option<Payload>,
}

impl RequestKey {
    pub fn new(method: &Method, uri: &str, payload: Option<&Payload>) -> RegistryResult<Self> {
        Ok(Self {
            method: method.clone(),
            uri: NormalizedUri::parse(uri)?,
            payload: payload.cloned(),
        })
    }
}
