//! Rendering canned responses into `http` types.

use std::time::Duration;

use bytes::Bytes;
use http::{header, HeaderValue, Response};

use crate::response::spec::StaticResponse;

/// A response ready to hand back to the client, with its simulated latency.
#[derive(Debug)]
pub struct RenderedResponse {
    pub response: Response<Bytes>,
    pub latency: Option<Duration>,
}

/// Build the `http::Response`. Adds `content-length` when the stub did not set one.
pub fn render(canned: StaticResponse) -> RenderedResponse {
    let StaticResponse {
        status,
        mut headers,
        body,
        latency,
    } = canned;

    if !headers.contains_key(header::CONTENT_LENGTH) {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    }

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;

    RenderedResponse { response, latency }
}
