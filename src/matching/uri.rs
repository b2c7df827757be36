//! URI normalization.
//!
//! # Responsibilities
//! - Canonicalize registered and incoming URIs with one function
//! - Sort query parameters so their order never affects matching
//! - Produce the explicit-default-port variant used during lookup
//!
//! # Design Decisions
//! - A string without a scheme is treated as `http://`
//! - Lower-casing scheme/host, dropping default ports and collapsing an
//!   empty path to `/` are all done by `url::Url` parsing
//! - Patterns are kept as compiled regexes and compared by their source

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use url::{Position, Url};

use crate::registry::types::{RegistryError, RegistryResult};

/// Normalize a URI string. Shorthand for [`NormalizedUri::parse`].
pub fn normalize_uri(input: &str) -> RegistryResult<NormalizedUri> {
    NormalizedUri::parse(input)
}

/// A URI in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUri {
    url: Url,
}

impl NormalizedUri {
    /// Parse and normalize a URI string.
    pub fn parse(input: &str) -> RegistryResult<Self> {
        let trimmed = input.trim();
        let with_scheme = if has_leading_scheme(trimmed) {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let url = Url::parse(&with_scheme).map_err(|source| RegistryError::InvalidUri {
            uri: input.to_string(),
            source,
        })?;
        Ok(Self::from_url(url))
    }

    /// Normalize an already parsed URL.
    pub fn from_url(mut url: Url) -> Self {
        let sorted = url.query().and_then(sort_query);
        url.set_query(sorted.as_deref());
        Self { url }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Textual forms an incoming request may be matched under.
    ///
    /// Always the canonical string; when the port is the scheme default (and
    /// therefore implied) also the same URI with that port written out.
    pub fn variations(&self) -> Vec<String> {
        let mut variations = vec![self.url.as_str().to_string()];

        if self.url.port().is_none() && self.url.host().is_some() {
            if let Some(port) = self.url.port_or_known_default() {
                variations.push(format!(
                    "{}:{}{}",
                    &self.url[..Position::AfterPort],
                    port,
                    &self.url[Position::BeforePath..]
                ));
            }
        }

        variations
    }
}

impl fmt::Display for NormalizedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// True if the input starts with `scheme://`. A `://` further along, e.g.
/// inside a query value, does not count.
fn has_leading_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn sort_query(query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let mut params: Vec<&str> = query.split('&').collect();
    params.sort_unstable();
    Some(params.join("&"))
}

/// Which precedence tier a registered URI belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriKind {
    Exact,
    Pattern,
}

/// A registered URI: either an exact normalized URI or a regex pattern.
#[derive(Debug, Clone)]
pub enum UriPattern {
    Exact(NormalizedUri),
    Pattern(Regex),
}

impl UriPattern {
    /// Compile a regex pattern.
    pub fn regex(pattern: &str) -> RegistryResult<Self> {
        Regex::new(pattern)
            .map(UriPattern::Pattern)
            .map_err(|source| RegistryError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn kind(&self) -> UriKind {
        match self {
            UriPattern::Exact(_) => UriKind::Exact,
            UriPattern::Pattern(_) => UriKind::Pattern,
        }
    }

    /// Returns true if any of the request's textual variations matches.
    pub fn matches(&self, variations: &[String]) -> bool {
        match self {
            UriPattern::Exact(uri) => variations.iter().any(|v| v == uri.as_str()),
            UriPattern::Pattern(re) => variations.iter().any(|v| re.is_match(v)),
        }
    }
}

impl PartialEq for UriPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UriPattern::Exact(a), UriPattern::Exact(b)) => a == b,
            (UriPattern::Pattern(a), UriPattern::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for UriPattern {}

impl Hash for UriPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            UriPattern::Exact(uri) => {
                0u8.hash(state);
                uri.hash(state);
            }
            UriPattern::Pattern(re) => {
                1u8.hash(state);
                re.as_str().hash(state);
            }
        }
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriPattern::Exact(uri) => write!(f, "{}", uri),
            UriPattern::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Anything that can be registered as a URI: strings, parsed URLs, regexes.
pub trait IntoUriPattern {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern>;
}

impl IntoUriPattern for UriPattern {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        Ok(self)
    }
}

impl IntoUriPattern for &str {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        NormalizedUri::parse(self).map(UriPattern::Exact)
    }
}

impl IntoUriPattern for String {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        self.as_str().into_uri_pattern()
    }
}

impl IntoUriPattern for &String {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        self.as_str().into_uri_pattern()
    }
}

impl IntoUriPattern for Url {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        Ok(UriPattern::Exact(NormalizedUri::from_url(self)))
    }
}

impl IntoUriPattern for NormalizedUri {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        Ok(UriPattern::Exact(self))
    }
}

impl IntoUriPattern for Regex {
    fn into_uri_pattern(self) -> RegistryResult<UriPattern> {
        Ok(UriPattern::Pattern(self))
    }
}
