//! Element hiding filter data model
//!
//! Filters arrive pre-parsed from the list compiler: a CSS selector, an
//! ordered list of domain entries (possibly negated), and a kind. Two filters
//! with the same canonical text are the same filter for reference-counting
//! purposes, so the canonical text doubles as the identity key.

use std::sync::Arc;

// =============================================================================
// Filter Kind
// =============================================================================

/// Kind of an element hiding filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Hides elements matching the selector.
    Hide,
    /// Suppresses hiding of the selector on matching domains.
    Exception,
}

// =============================================================================
// Domain Entries
// =============================================================================

/// A single domain restriction on a filter.
///
/// `included == false` records a `~domain` exclusion; exclusions are consulted
/// during resolution and never activate the filter on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain: String,
    pub included: bool,
}

/// Normalize a domain: ASCII lower-case, trailing dots stripped.
///
/// Malformed domains are normalized, never rejected.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim_end_matches('.').to_ascii_lowercase()
}

/// Parse a comma-separated domain list (`example.com,~www.example.com`) into
/// domain entries. This is list-compiler output splitting, not filter syntax
/// parsing; an empty string yields no entries.
pub fn domain_entries(list: &str) -> Vec<DomainEntry> {
    list.split(',')
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty() && *raw != "~")
        .map(|raw| match raw.strip_prefix('~') {
            Some(rest) => DomainEntry {
                domain: normalize_domain(rest),
                included: false,
            },
            None => DomainEntry {
                domain: normalize_domain(raw),
                included: true,
            },
        })
        .collect()
}

// =============================================================================
// Filter
// =============================================================================

/// A single element hiding filter or exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    text: Arc<str>,
    selector: String,
    domains: Vec<DomainEntry>,
    kind: FilterKind,
}

impl Filter {
    /// Build a filter from pre-parsed parts. The canonical text key is
    /// derived from the parts, so structurally identical filters share an
    /// identity.
    pub fn from_parts(kind: FilterKind, domains: Vec<DomainEntry>, selector: &str) -> Self {
        let separator = match kind {
            FilterKind::Hide => "##",
            FilterKind::Exception => "#@#",
        };

        let mut text = String::new();
        for (i, entry) in domains.iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            if !entry.included {
                text.push('~');
            }
            text.push_str(&entry.domain);
        }
        text.push_str(separator);
        text.push_str(selector);

        Self {
            text: text.into(),
            selector: selector.to_string(),
            domains,
            kind,
        }
    }

    /// Convenience constructor for a hiding filter with a comma-separated
    /// domain list.
    pub fn hiding(domains: &str, selector: &str) -> Self {
        Self::from_parts(FilterKind::Hide, domain_entries(domains), selector)
    }

    /// Convenience constructor for an exception filter.
    pub fn exception(domains: &str, selector: &str) -> Self {
        Self::from_parts(FilterKind::Exception, domain_entries(domains), selector)
    }

    /// Canonical filter text, used as the identity key.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the identity key.
    pub(crate) fn key(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// The CSS selector this filter hides (or, for exceptions, suppresses).
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Domain entries in their original order.
    pub fn domains(&self) -> &[DomainEntry] {
        &self.domains
    }

    /// True if no domain entry activates the filter on a particular domain,
    /// i.e. the filter applies everywhere its exclusions allow.
    pub fn is_generic(&self) -> bool {
        !self.domains.iter().any(|entry| entry.included)
    }

    /// True if one of the filter's `~domain` exclusions equals a member of
    /// the given domain chain.
    pub(crate) fn excluded_on<'a>(
        &self,
        chain: &std::collections::HashSet<&'a str>,
    ) -> bool {
        self.domains
            .iter()
            .any(|entry| !entry.included && chain.contains(entry.domain.as_str()))
    }
}

// =============================================================================
// Domain Chain
// =============================================================================

/// Iterator over a domain and its ancestors, ending with the root `""`.
///
/// `sub.example.com` yields `sub.example.com`, `example.com`, `com`, `""`.
/// The input must already be normalized.
pub struct DomainChain<'a> {
    current: Option<&'a str>,
}

impl<'a> DomainChain<'a> {
    pub fn new(domain: &'a str) -> Self {
        Self {
            current: Some(domain),
        }
    }
}

impl<'a> Iterator for DomainChain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;

        self.current = if result.is_empty() {
            None
        } else {
            match result.find('.') {
                Some(idx) => Some(&result[idx + 1..]),
                None => Some(""),
            }
        };

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("Example.COM"), "example.com");
        assert_eq!(normalize_domain("foo.com."), "foo.com");
        assert_eq!(normalize_domain("foo.com..."), "foo.com");
        assert_eq!(normalize_domain(""), "");
    }

    #[test]
    fn test_domain_entries() {
        assert_eq!(domain_entries(""), vec![]);

        let entries = domain_entries("Example.com,~WWW.example.com");
        assert_eq!(
            entries,
            vec![
                DomainEntry {
                    domain: "example.com".to_string(),
                    included: true
                },
                DomainEntry {
                    domain: "www.example.com".to_string(),
                    included: false
                },
            ]
        );
    }

    #[test]
    fn test_filter_identity() {
        let a = Filter::hiding("example.com,~www.example.com", "test");
        let b = Filter::hiding("example.com,~www.example.com", "test");
        assert_eq!(a.text(), b.text());
        assert_eq!(a.text(), "example.com,~www.example.com##test");

        let exception = Filter::exception("foo.com", "test");
        assert_eq!(exception.text(), "foo.com#@#test");

        let generic = Filter::hiding("", "test");
        assert_eq!(generic.text(), "##test");
        assert!(generic.is_generic());
    }

    #[test]
    fn test_generic_with_exclusions() {
        let filter = Filter::hiding("~example.com", "foo");
        assert!(filter.is_generic());
        assert_eq!(filter.domains().len(), 1);

        let filter = Filter::hiding("~foo.example.com,example.com", "foo");
        assert!(!filter.is_generic());
    }

    #[test]
    fn test_domain_chain() {
        let chain: Vec<&str> = DomainChain::new("sub.example.com").collect();
        assert_eq!(chain, vec!["sub.example.com", "example.com", "com", ""]);

        let chain: Vec<&str> = DomainChain::new("com").collect();
        assert_eq!(chain, vec!["com", ""]);

        let chain: Vec<&str> = DomainChain::new("").collect();
        assert_eq!(chain, vec![""]);
    }
}
