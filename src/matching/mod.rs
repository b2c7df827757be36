//! Request normalization and matching primitives.
//!
//! # Data Flow
//! ```text
//! Registration:  (method, uri-or-pattern, data)
//!     → method.rs  (MethodMatcher: exact method or Any)
//!     → uri.rs     (UriPattern: normalized URI, or regex left untouched)
//!     → payload.rs (Payload: structured mapping or literal bytes)
//!
//! Incoming request: (method, uri, body payload)
//!     → request.rs (RequestKey built with the same normalizers)
//!     → uri.rs     (canonical string + explicit-port variant)
//! ```
//!
//! # Design Decisions
//! - Stored keys and incoming keys go through the exact same functions
//! - Patterns are never parsed as URIs
//! - Payload normalization is structural recursion over a closed enum

pub mod method;
pub mod payload;
pub mod request;
pub mod uri;

pub use method::MethodMatcher;
pub use payload::{Payload, PayloadValue};
pub use request::RequestKey;
pub use uri::{normalize_uri, IntoUriPattern, NormalizedUri, UriKind, UriPattern};
