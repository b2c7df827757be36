//! Canned response subsystem.
//!
//! # Data Flow
//! ```text
//! Selected Stub
//!     → spec.rs   (ResponseSpec: static, raise, or callback with StubConnection)
//!     → render.rs (StaticResponse → http::Response<Bytes> + simulated latency)
//!     → returned to the intercepting client
//! ```
//!
//! # Design Decisions
//! - A simulated connection failure is an error, never a 5xx response
//! - Callbacks run outside the registry lock

pub mod render;
pub mod spec;

pub use render::{render, RenderedResponse};
pub use spec::{ConnectionFailure, ResponseCallback, ResponseSpec, StaticResponse, StubConnection};
