//! Stub storage and lookup.
//!
//! # Responsibilities
//! - Store stubs under URI → method → payload, in declaration order
//! - Resolve a request through the four precedence tiers
//! - Reject ambiguous registrations at lookup time
//!
//! # Design Decisions
//! - Whole-table mutex: register, reset and resolve never interleave
//! - Validation happens before the lock is taken
//! - `is_registered` shares the lookup path but never spends a use

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use http::Method;

use crate::matching::{IntoUriPattern, MethodMatcher, Payload, RequestKey, UriKind, UriPattern};
use crate::observability::metrics;
use crate::registry::stub::{self, Stub, StubOptions};
use crate::registry::types::{RegistryError, RegistryResult};

type PayloadBuckets = HashMap<Option<Payload>, Vec<Stub>>;
type MethodTable = HashMap<MethodMatcher, PayloadBuckets>;

/// Address of one stub sequence inside the table.
struct BucketKey {
    uri: UriPattern,
    method: MethodMatcher,
    payload: Option<Payload>,
}

#[derive(Debug, Default)]
struct StubTable {
    uris: HashMap<UriPattern, MethodTable>,
    stubs: usize,
}

impl StubTable {
    fn insert(&mut self, stub: Stub) {
        self.uris
            .entry(stub.uri.clone())
            .or_default()
            .entry(stub.method.clone())
            .or_default()
            .entry(stub.payload.clone())
            .or_default()
            .push(stub);
        self.stubs += 1;
    }

    /// Find the stub sequence a request resolves to.
    fn locate(&self, request: &RequestKey) -> RegistryResult<Option<BucketKey>> {
        let variations = request.uri.variations();
        let exact = MethodMatcher::Exact(request.method.clone());
        let any = MethodMatcher::Any;
        let tiers = [
            (&exact, UriKind::Exact),
            (&any, UriKind::Exact),
            (&exact, UriKind::Pattern),
            (&any, UriKind::Pattern),
        ];

        for (method, kind) in tiers {
            let matches: Vec<(&UriPattern, &PayloadBuckets)> = self
                .uris
                .iter()
                .filter(|(uri, _)| uri.kind() == kind && uri.matches(&variations))
                .filter_map(|(uri, methods)| methods.get(method).map(|buckets| (uri, buckets)))
                .collect();

            if matches.len() > 1 {
                let mut candidates: Vec<String> = matches.iter().map(|(uri, _)| uri.to_string()).collect();
                candidates.sort();
                return Err(RegistryError::MultipleMatches {
                    method: request.method.clone(),
                    uri: request.uri.to_string(),
                    matches: candidates,
                });
            }

            let Some((uri, buckets)) = matches.into_iter().next() else {
                continue;
            };

            // An exact payload always wins over the catch-all.
            let payload = if has_stubs(buckets, &request.payload) {
                request.payload.clone()
            } else if has_stubs(buckets, &None) {
                None
            } else {
                continue;
            };

            return Ok(Some(BucketKey {
                uri: uri.clone(),
                method: method.clone(),
                payload,
            }));
        }

        Ok(None)
    }

    fn sequence_mut(&mut self, key: &BucketKey) -> Option<&mut Vec<Stub>> {
        self.uris
            .get_mut(&key.uri)?
            .get_mut(&key.method)?
            .get_mut(&key.payload)
    }
}

fn has_stubs(buckets: &PayloadBuckets, payload: &Option<Payload>) -> bool {
    buckets.get(payload).is_some_and(|seq| !seq.is_empty())
}

/// The store of all registered stubs.
#[derive(Debug, Default)]
pub struct Registry {
    table: Mutex<StubTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StubTable> {
        // A panicking response callback never runs under this lock, so the
        // table is consistent even if the mutex was poisoned.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a single stub.
    pub fn register(
        &self,
        method: impl Into<MethodMatcher>,
        uri: impl IntoUriPattern,
        options: StubOptions,
    ) -> RegistryResult<()> {
        self.register_all(method, uri, [options]).map(|_| ())
    }

    /// Register a sequence of stubs under one key, atomically.
    ///
    /// Each option set keys on its own `data`. Stubs are appended after any
    /// already registered under the same (URI, method, payload).
    pub fn register_all<I>(
        &self,
        method: impl Into<MethodMatcher>,
        uri: impl IntoUriPattern,
        options: I,
    ) -> RegistryResult<usize>
    where
        I: IntoIterator<Item = StubOptions>,
    {
        let method = method.into();
        let uri = uri.into_uri_pattern()?;

        let stubs = options
            .into_iter()
            .map(|opts| opts.build(&method, &uri))
            .collect::<RegistryResult<Vec<_>>>()?;

        if stubs.is_empty() {
            return Err(RegistryError::EmptySequence {
                method: method.to_string(),
                uri: uri.to_string(),
            });
        }

        let count = stubs.len();
        let total = {
            let mut table = self.lock();
            for stub in stubs {
                table.insert(stub);
            }
            table.stubs
        };

        tracing::debug!(method = %method, uri = %uri, stubs = count, "Stubs registered");
        metrics::record_registration(count, total);
        Ok(count)
    }

    /// Whether `resolve` would return a stub. Never spends a use.
    pub fn is_registered(&self, method: &Method, uri: &str, payload: Option<&Payload>) -> RegistryResult<bool> {
        let key = RequestKey::new(method, uri, payload)?;
        self.is_registered_key(&key)
    }

    pub fn is_registered_key(&self, key: &RequestKey) -> RegistryResult<bool> {
        let table = self.lock();
        Ok(table.locate(key)?.is_some())
    }

    /// Resolve a request to a stub, spending one of its uses.
    pub fn resolve(&self, method: &Method, uri: &str, payload: Option<&Payload>) -> RegistryResult<Option<Stub>> {
        let key = RequestKey::new(method, uri, payload)?;
        self.resolve_key(&key)
    }

    pub fn resolve_key(&self, key: &RequestKey) -> RegistryResult<Option<Stub>> {
        let mut table = self.lock();

        let bucket = match table.locate(key) {
            Ok(bucket) => bucket,
            Err(err) => {
                drop(table);
                tracing::warn!(method = %key.method, uri = %key.uri, error = %err, "Ambiguous stub registration");
                metrics::record_resolution("ambiguous");
                return Err(err);
            }
        };

        let selected = bucket
            .as_ref()
            .and_then(|bucket| table.sequence_mut(bucket))
            .and_then(|sequence| stub::select(sequence));
        drop(table);

        match &selected {
            Some(stub) => {
                tracing::debug!(
                    method = %key.method,
                    uri = %key.uri,
                    registered_uri = %stub.uri,
                    registered_method = %stub.method,
                    "Stub matched"
                );
                metrics::record_resolution("hit");
            }
            None => {
                tracing::debug!(method = %key.method, uri = %key.uri, "No stub matched");
                metrics::record_resolution("miss");
            }
        }

        Ok(selected)
    }

    /// Remove every stub.
    pub fn reset(&self) {
        let mut table = self.lock();
        *table = StubTable::default();
        drop(table);
        tracing::debug!("Registry reset");
        metrics::record_registration(0, 0);
    }

    /// Number of registered stubs.
    pub fn len(&self) -> usize {
        self.lock().stubs
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
