//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / intercept produce:
//!     → tracing events (structured key/value fields)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → logging.rs installs a fmt subscriber (CLI, test harnesses)
//!     → any `metrics` recorder the host installs
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers/recorders is the host's call
//! - Log level configurable via config and `RUST_LOG`

pub mod logging;
pub mod metrics;
