//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{header, Method, Request, Response, StatusCode};
use webstub::config::InterceptConfig;
use webstub::intercept::{BoxError, Transport};
use webstub::{Interceptor, Registry, StubClient};

/// Transport standing in for the real network; records what reached it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl Transport for RecordingTransport {
    fn send(&self, request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>, BoxError>> {
        self.seen
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method(), request.uri()));
        Box::pin(async {
            let mut response = Response::new(Bytes::from_static(b"real network"));
            *response.status_mut() = StatusCode::OK;
            Ok(response)
        })
    }
}

/// A client over a fresh registry with real connections disabled.
pub fn stub_client() -> StubClient<RecordingTransport> {
    let interceptor = Interceptor::new(
        Arc::new(Registry::new()),
        InterceptConfig {
            allow_net_connect: false,
        },
    );
    StubClient::new(interceptor, RecordingTransport::default())
}

pub fn registry(client: &StubClient<RecordingTransport>) -> &Registry {
    client.interceptor().registry()
}

/// Requests that reached the transport.
pub fn passthrough_count(client: &StubClient<RecordingTransport>) -> usize {
    client.transport().seen.lock().unwrap().len()
}

pub fn get(uri: &str) -> Request<Bytes> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

/// A form-encoded request, like an HTML form post.
pub fn form_request(method: Method, uri: &str, fields: &[(&str, &str)]) -> Request<Bytes> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from(body))
        .unwrap()
}

pub fn text_request(method: Method, uri: &str, body: &'static str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

pub fn body_text(response: &Response<Bytes>) -> String {
    String::from_utf8_lossy(response.body()).into_owned()
}
