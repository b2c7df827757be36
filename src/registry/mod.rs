//! Stub registry subsystem.
//!
//! # Data Flow
//! ```text
//! register(method, uri, [StubOptions])
//!     → stub.rs  (validate options, build Stub)
//!     → store.rs (append under uri → method → payload, one lock)
//!
//! resolve(method, uri, payload)
//!     → store.rs (tiered lookup: exact/any method × exact/pattern URI)
//!     → ambiguity check per tier
//!     → payload bucket (exact payload, else catch-all)
//!     → first stub with uses left, else the last stub
//! ```
//!
//! # Design Decisions
//! - Registrations append, never overwrite
//! - One mutex guards the whole table; lookups are O(registered URIs)
//! - Ambiguity is always an error, never a silent pick

pub mod stub;
pub mod store;
pub mod types;

use std::sync::{Arc, OnceLock};

pub use store::Registry;
pub use stub::{IntoPayload, Stub, StubOptions, Times};
pub use types::{RegistryError, RegistryResult};

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// The process-wide default registry.
///
/// Meant for the outermost composition point only; everything else takes an
/// explicit `Arc<Registry>`.
pub fn global() -> Arc<Registry> {
    GLOBAL.get_or_init(|| Arc::new(Registry::new())).clone()
}
