//! Reference-counted filter store
//!
//! The hiding store and the exception store share this type: a domain filter
//! index plus a per-filter reference count. Filter lists routinely contain
//! the same filter more than once, so a filter is indexed on the 0→1
//! transition and unindexed on 1→0; removing a filter that was never added
//! is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::filter::Filter;
use crate::index::DomainFilterIndex;

struct FilterRef {
    filter: Arc<Filter>,
    count: u32,
}

/// A set of active filters with duplicate-add accounting, indexed by domain.
#[derive(Default)]
pub struct FilterStore {
    index: DomainFilterIndex,
    refs: HashMap<Arc<str>, FilterRef>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter. Re-adding an active filter only increments its
    /// reference count.
    pub fn add(&mut self, filter: Filter) {
        if let Some(existing) = self.refs.get_mut(filter.text()) {
            existing.count += 1;
            return;
        }

        debug!("activating filter {}", filter.text());
        let filter = Arc::new(filter);
        self.index.index(&filter);
        self.refs.insert(
            filter.key(),
            FilterRef { filter, count: 1 },
        );
    }

    /// Remove a filter. The filter is unindexed once its reference count
    /// drops to zero; removing an inactive filter changes nothing.
    pub fn remove(&mut self, filter: &Filter) {
        let Some(existing) = self.refs.get_mut(filter.text()) else {
            return;
        };

        existing.count -= 1;
        if existing.count == 0 {
            debug!("deactivating filter {}", filter.text());
            let filter = Arc::clone(&existing.filter);
            self.index.unindex(&filter);
            self.refs.remove(filter.text());
        }
    }

    /// True if the filter is currently active.
    pub fn contains(&self, filter: &Filter) -> bool {
        self.refs.contains_key(filter.text())
    }

    /// Number of distinct active filters.
    pub fn filter_count(&self) -> usize {
        self.refs.len()
    }

    /// Number of non-empty domain buckets, excluding the universal bucket.
    pub fn domain_count(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn index(&self) -> &DomainFilterIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_add_remove() {
        let mut store = FilterStore::new();
        let filter = Filter::hiding("example.com", "dupe");

        store.add(filter.clone());
        store.add(filter.clone());
        assert!(store.contains(&filter));
        assert_eq!(store.filter_count(), 1);
        assert_eq!(store.domain_count(), 1);

        store.remove(&filter);
        assert!(store.contains(&filter));
        assert_eq!(store.domain_count(), 1);

        store.remove(&filter);
        assert!(!store.contains(&filter));
        assert_eq!(store.domain_count(), 0);

        // Removing an inactive filter is a no-op.
        store.remove(&filter);
        assert!(!store.contains(&filter));
        assert_eq!(store.filter_count(), 0);
    }

    #[test]
    fn test_domain_count_tracks_buckets() {
        let mut store = FilterStore::new();

        store.add(Filter::hiding("", "test"));
        assert_eq!(store.domain_count(), 0);

        store.add(Filter::hiding("example.com", "test"));
        assert_eq!(store.domain_count(), 1);

        store.add(Filter::hiding("example.com,~www.example.com", "test"));
        assert_eq!(store.domain_count(), 2);

        store.remove(&Filter::hiding("example.com", "test"));
        assert_eq!(store.domain_count(), 2);

        store.remove(&Filter::hiding("example.com,~www.example.com", "test"));
        assert_eq!(store.domain_count(), 0);
    }
}
