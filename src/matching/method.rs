//! HTTP method matching.

use std::fmt;
use std::str::FromStr;

use http::Method;

use crate::registry::types::RegistryError;

/// The method a stub was registered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodMatcher {
    /// Matches every method, after exact-method registrations.
    Any,
    Exact(Method),
}

impl From<Method> for MethodMatcher {
    fn from(method: Method) -> Self {
        MethodMatcher::Exact(method)
    }
}

impl From<&Method> for MethodMatcher {
    fn from(method: &Method) -> Self {
        MethodMatcher::Exact(method.clone())
    }
}

impl FromStr for MethodMatcher {
    type Err = RegistryError;

    /// Case-insensitive; `any` and `*` select [`MethodMatcher::Any`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "ANY" || upper == "*" {
            return Ok(MethodMatcher::Any);
        }
        Method::from_bytes(upper.as_bytes())
            .map(MethodMatcher::Exact)
            .map_err(|_| RegistryError::InvalidMethod(s.to_string()))
    }
}

impl fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodMatcher::Any => f.write_str("ANY"),
            MethodMatcher::Exact(method) => write!(f, "{}", method),
        }
    }
}
