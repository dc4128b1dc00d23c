//! Unique name generation for synthesized classes.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::DashMap;

/// Supplies qualified names for generated classes.
pub trait ClassNameSupplier: Send + Sync {
    /// The next name; every call yields a value never returned before by this supplier
    fn next_name(&self) -> String;
}

/// Appends an atomically incremented numeric suffix to a fixed base prefix.
///
/// The counter is a single atomic fetch-and-add, so no two callers can observe the
/// same value; the sequence is monotone but callers must not rely on it being gapless.
#[derive(Debug)]
pub struct IncrementingNameSupplier {
    base: String,
    next: AtomicU64,
}

impl IncrementingNameSupplier {
    /// Create a supplier counting from zero for the given base prefix
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        IncrementingNameSupplier {
            base: base.into(),
            next: AtomicU64::new(0),
        }
    }

    /// The base prefix every produced name starts with
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl ClassNameSupplier for IncrementingNameSupplier {
    fn next_name(&self) -> String {
        format!("{}{}", self.base, self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-prefix supplier cache.
///
/// Two callers requesting a supplier for the same base prefix observe the same
/// monotonically increasing sequence rather than each starting from zero. The cache is
/// an injectable value, not a process-wide singleton, so tests isolate their own
/// sequences.
#[derive(Debug, Default)]
pub struct NameSupplierCache {
    suppliers: DashMap<String, Arc<IncrementingNameSupplier>>,
}

impl NameSupplierCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        NameSupplierCache::default()
    }

    /// The supplier for `base`, created on first request
    #[must_use]
    pub fn supplier(&self, base: &str) -> Arc<IncrementingNameSupplier> {
        self.suppliers
            .entry(base.to_string())
            .or_insert_with(|| Arc::new(IncrementingNameSupplier::new(base)))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sequential() {
        let supplier = IncrementingNameSupplier::new("com.example.Gen$");
        assert_eq!(supplier.next_name(), "com.example.Gen$0");
        assert_eq!(supplier.next_name(), "com.example.Gen$1");
    }

    #[test]
    fn test_cache_shares_one_sequence_per_base() {
        let cache = NameSupplierCache::new();
        let first = cache.supplier("com.example.Gen$");
        let second = cache.supplier("com.example.Gen$");
        assert!(Arc::ptr_eq(&first, &second));

        assert_eq!(first.next_name(), "com.example.Gen$0");
        assert_eq!(second.next_name(), "com.example.Gen$1");

        let other = cache.supplier("com.example.Other$");
        assert_eq!(other.next_name(), "com.example.Other$0");
    }
}
