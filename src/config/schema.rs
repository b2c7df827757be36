//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML fixture files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebstubConfig {
    /// Passthrough policy.
    pub intercept: InterceptConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Stubs to register.
    pub stubs: Vec<StubFixture>,
}

/// Interception policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Let unmatched requests reach the real network.
    pub allow_net_connect: bool,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            allow_net_connect: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// One registration: a method + URI and the responses to serve, in order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StubFixture {
    /// HTTP method, or "any".
    #[serde(default = "default_method")]
    pub method: String,

    /// URI, or a regular expression when `pattern` is set.
    pub uri: String,

    /// Treat `uri` as a regular expression.
    #[serde(default)]
    pub pattern: bool,

    /// Responses registered under this key.
    pub responses: Vec<FixtureResponse>,
}

fn default_method() -> String {
    "any".to_string()
}

/// A single canned response.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureResponse {
    /// HTTP status code (default: 200).
    pub status: Option<u16>,

    pub headers: BTreeMap<String, String>,

    /// Inline response body.
    pub body: Option<String>,

    /// Response body read from a file.
    pub body_file: Option<PathBuf>,

    /// Payload matcher: a table matches structured payloads, a string
    /// matches literal bodies.
    pub data: Option<serde_json::Value>,

    /// Number of uses; `0` is rejected, absent means one use.
    pub times: Option<u32>,

    /// Serve forever.
    pub unlimited: bool,

    /// Connection failure to raise instead of responding
    /// (`refused`, `reset`, `timed_out`, or a free-form message).
    pub raises: Option<String>,

    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}
