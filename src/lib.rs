//! Canned HTTP responses for test code.
//!
//! Test code declares stubs (method, URI or pattern, optional payload) with a
//! canned response; an HTTP client routed through [`intercept::Interceptor`]
//! gets those responses back instead of touching the network.
//!
//! ```text
//!   register(method, uri, options)          attempt_intercept(method, uri, payload)
//!            │                                          │
//!            ▼                                          ▼
//!   ┌─────────────────┐   normalize    ┌──────────────────────────────┐
//!   │    matching     │◀──────────────▶│          registry            │
//!   │ uri / payload / │                │  uri → method → payload →    │
//!   │     method      │                │        [Stub, Stub, ...]     │
//!   └─────────────────┘                └──────────────┬───────────────┘
//!                                                     │ selected Stub
//!                                                     ▼
//!                                      ┌──────────────────────────────┐
//!                                      │   response (spec + render)   │
//!                                      └──────────────────────────────┘
//! ```

// Core subsystems
pub mod matching;
pub mod registry;
pub mod response;

// Client-facing seam
pub mod intercept;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::WebstubConfig;
pub use intercept::{Interception, Interceptor, StubClient};
pub use matching::{MethodMatcher, Payload, PayloadValue, UriPattern};
pub use registry::{Registry, RegistryError, Stub, StubOptions, Times};
pub use response::{ConnectionFailure, ResponseSpec, StaticResponse};
