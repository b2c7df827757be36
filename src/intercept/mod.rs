//! Interception seam between an HTTP client and the registry.
//!
//! # Data Flow
//! ```text
//! http::Request<Bytes>
//!     → body.rs        (extract payload: form / JSON / literal)
//!     → interceptor.rs (RequestKey → Registry::resolve)
//!         ├─ stub found   → ResponseSpec → render → Respond
//!         ├─ no stub, passthrough allowed → Passthrough
//!         └─ no stub, passthrough denied  → NoStubRegistered
//!     → client.rs      (latency, or hand off to Transport)
//! ```
//!
//! # Design Decisions
//! - Composition over patching: clients call the interceptor explicitly
//! - The passthrough flag lives in config, swapped atomically

pub mod body;
pub mod client;
pub mod interceptor;
pub mod types;

pub use client::{NoNetwork, StubClient, Transport};
pub use interceptor::{Interception, Interceptor};
pub use types::{BoxError, InterceptError, InterceptResult};
