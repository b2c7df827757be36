//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! fixtures file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → WebstubConfig (validated)
//!     → fixtures.rs (register every [[stubs]] entry into a Registry)
//!
//! [intercept] section:
//!     → Interceptor (held in an ArcSwap, flipped at runtime by tests)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A fixture entry registers atomically, like one `register_all` call

pub mod fixtures;
pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{FixtureResponse, InterceptConfig, ObservabilityConfig, StubFixture, WebstubConfig};
