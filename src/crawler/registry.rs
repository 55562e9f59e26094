//! Deduplication registry
//!
//! The registry is the single authority on whether an address has already
//! been scheduled during a crawl session. It only ever grows.

use crate::url::SiteScope;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Set of addresses already scheduled in one crawl session
#[derive(Debug)]
pub struct Registry {
    scope: SiteScope,
    seen: Mutex<HashSet<String>>,
}

impl Registry {
    /// Creates an empty registry restricted to `scope`
    pub fn new(scope: SiteScope) -> Self {
        Self {
            scope,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Records an address, returning true the first time it is seen
    ///
    /// Addresses outside the registry's scope are never recorded and always
    /// return false. The key is the address's string form, so
    /// `/Page` and `/page`, or `/docs` and `/docs/`, are distinct entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawl_o_matic::crawler::Registry;
    /// use crawl_o_matic::url::SiteScope;
    /// use url::Url;
    ///
    /// let seed = Url::parse("https://example.com/").unwrap();
    /// let registry = Registry::new(SiteScope::of(&seed).unwrap());
    ///
    /// assert!(registry.register(&seed));
    /// assert!(!registry.register(&seed));
    /// assert!(!registry.register(&Url::parse("https://other.com/").unwrap()));
    /// ```
    pub fn register(&self, url: &Url) -> bool {
        if !self.scope.contains(url) {
            tracing::trace!("Out of scope, not scheduling: {}", url);
            return false;
        }

        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.as_str().to_string())
    }

    /// Number of registered addresses
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
