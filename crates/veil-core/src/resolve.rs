//! Per-domain selector resolution
//!
//! The resolver owns the hiding store and the exception store and answers
//! the hot-path question: which selectors should be hidden on a page served
//! from a given domain? It walks the domain's ancestor chain, collects
//! hiding filters from every matching bucket (plus the universal bucket
//! unless only domain-specific results are wanted), drops filters excluded
//! by one of their own `~domain` entries, and finally drops any selector the
//! exception store yields for the same chain.
//!
//! The selector list may contain duplicates: a filter reachable from several
//! chain positions contributes its selector once per position. Deduplicating
//! here would cost more than emitting the selector twice, so callers that
//! need exact sets must deduplicate themselves.

use std::collections::HashSet;

use log::trace;

use crate::filter::{normalize_domain, DomainChain, Filter, FilterKind};
use crate::index::DomainFilterIndex;
use crate::store::FilterStore;
use crate::stylesheet::create_style_sheet;

// =============================================================================
// Result
// =============================================================================

/// Style sheet generated for one domain.
pub struct DomainStyleSheet {
    /// CSS hiding every resolved selector.
    pub code: String,
    /// The resolved selectors, possibly with duplicates. Empty unless the
    /// selector list was requested.
    pub selectors: Vec<String>,
}

// =============================================================================
// Resolver
// =============================================================================

/// Element hiding engine: active hiding filters, their exceptions, and
/// per-domain style sheet generation.
///
/// All operations are synchronous and non-blocking. In a multi-threaded
/// host, wrap the resolver in a reader/writer lock: resolution takes `&self`
/// and may run concurrently, `add`/`remove` take `&mut self`.
#[derive(Default)]
pub struct Resolver {
    filters: FilterStore,
    exceptions: FilterStore,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, routing it to the hiding or exception store by kind.
    pub fn add(&mut self, filter: Filter) {
        match filter.kind() {
            FilterKind::Hide => self.filters.add(filter),
            FilterKind::Exception => self.exceptions.add(filter),
        }
    }

    /// Remove a previously added filter; unknown filters are ignored.
    pub fn remove(&mut self, filter: &Filter) {
        match filter.kind() {
            FilterKind::Hide => self.filters.remove(filter),
            FilterKind::Exception => self.exceptions.remove(filter),
        }
    }

    /// The hiding filter store.
    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    /// The exception filter store.
    pub fn exceptions(&self) -> &FilterStore {
        &self.exceptions
    }

    /// Resolve the selectors to hide on `domain` and render them as CSS.
    ///
    /// With `specific_only`, universal filters are left out and only filters
    /// carrying an activating entry for the domain or one of its ancestors
    /// apply. The selector list is returned only if `include_selectors` is
    /// set; the CSS is always generated. A trailing dot on the domain is
    /// ignored and the empty domain resolves against universal filters only.
    pub fn style_sheet_for_domain(
        &self,
        domain: &str,
        specific_only: bool,
        include_selectors: bool,
    ) -> DomainStyleSheet {
        let domain = normalize_domain(domain);
        let chain: Vec<&str> = DomainChain::new(&domain).collect();
        let chain_set: HashSet<&str> = chain.iter().copied().collect();

        // Exceptions resolve over the same chain with the same algorithm,
        // universal entries included, and suppress by selector text: one
        // exception covers every hiding filter sharing its selector.
        let excepted: HashSet<&str> =
            chain_filters(self.exceptions.index(), &chain, &chain_set, false)
                .map(|filter| filter.selector())
                .collect();

        let mut selectors = Vec::new();
        for filter in chain_filters(self.filters.index(), &chain, &chain_set, specific_only) {
            if !excepted.contains(filter.selector()) {
                selectors.push(filter.selector().to_string());
            }
        }

        trace!(
            "resolved {} selectors for {:?} ({} excepted)",
            selectors.len(),
            domain,
            excepted.len()
        );

        let code = create_style_sheet(&selectors);
        DomainStyleSheet {
            code,
            selectors: if include_selectors {
                selectors
            } else {
                Vec::new()
            },
        }
    }
}

/// Filters applying somewhere on the given domain chain.
///
/// Yields every activating bucket entry along the chain, then the universal
/// bucket unless `specific_only`. A filter is skipped entirely when one of
/// its `~domain` entries names a chain member, independent of where on the
/// chain its activating entry sits.
fn chain_filters<'a>(
    index: &'a DomainFilterIndex,
    chain: &'a [&'a str],
    chain_set: &'a HashSet<&'a str>,
    specific_only: bool,
) -> impl Iterator<Item = &'a Filter> {
    let specific = chain
        .iter()
        .filter_map(move |domain| index.bucket(domain))
        .flat_map(|bucket| bucket.values())
        .filter(|entry| entry.included);

    let universal = if specific_only {
        None
    } else {
        Some(index.universal().values())
    };

    specific
        .chain(universal.into_iter().flatten())
        .map(|entry| &*entry.filter)
        .filter(move |filter| !filter.excluded_on(chain_set))
}
