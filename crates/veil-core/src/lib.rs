//! Veil Core Library
//!
//! This crate provides the element hiding engine for the Veil content
//! blocker: given the active set of element hiding filters and their
//! exceptions, it resolves the CSS selectors to hide on any particular
//! domain and renders them as engine-safe CSS. It sits on the hot path of
//! page rendering; filter list parsing, list fetching and the host UI live
//! in other crates.
//!
//! # Modules
//!
//! - `filter`: filter data model, domain normalization, domain chain walking
//! - `index`: domain-keyed filter index with a universal bucket
//! - `store`: reference-counted filter store (hiding and exception instances)
//! - `resolve`: per-domain selector resolution
//! - `stylesheet`: chunked CSS serialization and rule extraction

pub mod filter;
pub mod index;
pub mod resolve;
pub mod store;
pub mod stylesheet;

// Re-export commonly used types
pub use filter::{domain_entries, normalize_domain, DomainChain, DomainEntry, Filter, FilterKind};
pub use index::DomainFilterIndex;
pub use resolve::{DomainStyleSheet, Resolver};
pub use store::FilterStore;
pub use stylesheet::{
    create_style_sheet, rules_from_style_sheet, StyleSheetError, StyleSheetRules,
    SELECTOR_GROUP_SIZE,
};
