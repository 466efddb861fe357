//! Domain-keyed filter index
//!
//! Maps normalized domain names to the set of filters restricted to them,
//! with a separate universal bucket for filters that apply everywhere. The
//! hiding store and the exception store both build on this index.

use std::collections::HashMap;
use std::sync::Arc;

use crate::filter::Filter;

// =============================================================================
// Buckets
// =============================================================================

/// A filter's membership in a domain bucket.
///
/// `included == false` means the filter carries a `~domain` entry for this
/// bucket's domain: the entry keeps the bucket alive for diagnostics but
/// never activates the filter there.
#[derive(Debug, Clone)]
pub struct BucketEntry {
    pub filter: Arc<Filter>,
    pub included: bool,
}

/// Filters keyed by canonical filter text; insertion order is irrelevant.
pub type Bucket = HashMap<Arc<str>, BucketEntry>;

// =============================================================================
// Index
// =============================================================================

/// Index of filters by the domains they are restricted to.
///
/// A filter with domain entries is indexed under every entry's domain key,
/// negated ones included. A filter with no activating entry (no entries at
/// all, or only negated ones) additionally lands in the universal bucket.
/// Buckets are deleted as soon as they become empty, so [`len`](Self::len)
/// reflects only domains with at least one referencing filter.
#[derive(Debug, Default)]
pub struct DomainFilterIndex {
    by_domain: HashMap<String, Bucket>,
    universal: Bucket,
}

impl DomainFilterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter into the bucket of each of its domain entries, and
    /// into the universal bucket if nothing activates it on a specific
    /// domain. Domain entries are expected pre-normalized.
    pub fn index(&mut self, filter: &Arc<Filter>) {
        for entry in filter.domains() {
            let bucket = self.by_domain.entry(entry.domain.clone()).or_default();
            bucket.insert(
                filter.key(),
                BucketEntry {
                    filter: Arc::clone(filter),
                    included: entry.included,
                },
            );
        }

        if filter.is_generic() {
            self.universal.insert(
                filter.key(),
                BucketEntry {
                    filter: Arc::clone(filter),
                    included: true,
                },
            );
        }
    }

    /// Reverse of [`index`](Self::index); deletes buckets that become empty.
    pub fn unindex(&mut self, filter: &Filter) {
        for entry in filter.domains() {
            if let Some(bucket) = self.by_domain.get_mut(&entry.domain) {
                bucket.remove(filter.text());
                if bucket.is_empty() {
                    self.by_domain.remove(&entry.domain);
                }
            }
        }

        if filter.is_generic() {
            self.universal.remove(filter.text());
        }
    }

    /// The bucket for an exact domain key, if any filter references it.
    pub fn bucket(&self, domain: &str) -> Option<&Bucket> {
        self.by_domain.get(domain)
    }

    /// Filters with no activating domain entry.
    pub fn universal(&self) -> &Bucket {
        &self.universal
    }

    /// Number of non-empty domain buckets, excluding the universal bucket.
    pub fn len(&self) -> usize {
        self.by_domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_domain.is_empty()
    }
}
