//! Lazy, memoized resolution of method binds.
//!
//! The host's symbol table is queried by two strings (declaring class name,
//! member name) and answers with an opaque call target. That lookup is paid
//! once per key; afterwards every caller gets the cached token. Tokens are
//! not stable across host processes, so nothing here is ever persisted and
//! the cache lives exactly as long as the process.

use crate::error::{InteropError, InteropResult};
use crate::host::MethodBind;
use rustc_hash::FxHashMap;
use std::sync::RwLock;

/// Process-lifetime cache of `(declaring class, member) -> MethodBind`.
///
/// First-resolution-wins: concurrent first resolutions of the same key are
/// serialized behind the write lock so exactly one host lookup runs and all
/// callers observe the same token. Keys are globally unique within one
/// loaded plugin and entries are never evicted.
pub struct SymbolCache {
    entries: RwLock<FxHashMap<String, MethodBind>>,
}

impl SymbolCache {
    pub fn new() -> Self {
        SymbolCache {
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Resolve `(class, method)`, calling `lookup` at most once per key.
    ///
    /// A lookup that returns `None` is a fatal [`InteropError::Resolution`]
    /// surfaced at first use; a null token is never handed out to be
    /// dereferenced later.
    pub fn resolve_with<F>(&self, class: &str, method: &str, lookup: F) -> InteropResult<MethodBind>
    where
        F: FnOnce(&str, &str) -> Option<MethodBind>,
    {
        let key = Self::key(class, method);

        if let Some(bind) = self.entries.read().expect("symbol cache poisoned").get(&key) {
            return Ok(*bind);
        }

        let mut entries = self.entries.write().expect("symbol cache poisoned");
        // Another thread may have resolved the key while we waited.
        if let Some(bind) = entries.get(&key) {
            return Ok(*bind);
        }

        let bind = lookup(class, method).ok_or_else(|| InteropError::Resolution {
            class: class.to_string(),
            method: method.to_string(),
        })?;
        entries.insert(key, bind);
        Ok(bind)
    }

    pub fn contains(&self, class: &str, method: &str) -> bool {
        self.entries
            .read()
            .expect("symbol cache poisoned")
            .contains_key(&Self::key(class, method))
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("symbol cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Class names cannot contain "::", so the composite key is unambiguous.
    fn key(class: &str, method: &str) -> String {
        format!("{class}::{method}")
    }
}

impl Default for SymbolCache {
    fn default() -> Self {
        SymbolCache::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Void;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bind(token: usize) -> MethodBind {
        MethodBind::from_raw(token as *const Void)
    }

    #[test]
    fn second_resolution_skips_the_lookup() {
        let cache = SymbolCache::new();
        let lookups = AtomicUsize::new(0);

        for _ in 0..5 {
            let resolved = cache
                .resolve_with("Timer", "set_wait_time", |_, _| {
                    lookups.fetch_add(1, Ordering::SeqCst);
                    Some(bind(0x10))
                })
                .unwrap();
            assert_eq!(resolved, bind(0x10));
        }
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn racing_first_resolutions_run_one_lookup() {
        let cache = SymbolCache::new();
        let lookups = AtomicUsize::new(0);
        let barrier = std::sync::Barrier::new(8);

        let binds: Vec<MethodBind> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache
                            .resolve_with("Node", "get_name", |_, _| {
                                lookups.fetch_add(1, Ordering::SeqCst);
                                Some(bind(0x10))
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert!(binds.iter().all(|b| *b == bind(0x10)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_classes_resolve_separately() {
        let cache = SymbolCache::new();
        cache
            .resolve_with("Node", "get_name", |_, _| Some(bind(0x10)))
            .unwrap();
        cache
            .resolve_with("Timer", "get_name", |_, _| Some(bind(0x20)))
            .unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("Node", "get_name"));
        assert!(cache.contains("Timer", "get_name"));
    }

    #[test]
    fn missing_symbol_is_an_error_and_not_cached() {
        let cache = SymbolCache::new();
        let err = cache
            .resolve_with("Timer", "no_such_method", |_, _| None)
            .unwrap_err();
        assert_eq!(
            err,
            InteropError::Resolution {
                class: "Timer".to_string(),
                method: "no_such_method".to_string(),
            }
        );
        assert!(cache.is_empty());
    }
}
