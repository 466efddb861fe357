//! Veil CLI
//!
//! Diagnostics tool for the element hiding engine: loads structured filter
//! records from a JSON file, resolves the style sheet for a domain and
//! reports store statistics. Records carry pre-parsed selector / domain
//! list / kind fields; textual filter list syntax is handled upstream.

use std::fs;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use veil_core::{Filter, Resolver};

#[derive(Parser)]
#[command(name = "veil-cli")]
#[command(about = "Veil element hiding engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the style sheet for a domain
    Resolve {
        /// JSON file with filter records
        #[arg(short, long)]
        filters: String,

        /// Domain to resolve
        #[arg(short, long)]
        domain: String,

        /// Skip universal filters
        #[arg(long)]
        specific_only: bool,

        /// Print the selector list instead of CSS
        #[arg(long)]
        selectors: bool,
    },

    /// Print store statistics for a filter file
    Stats {
        /// JSON file with filter records
        #[arg(short, long)]
        filters: String,
    },
}

/// One pre-parsed filter, as produced by the list compiler.
#[derive(Deserialize)]
struct FilterRecord {
    selector: String,
    #[serde(default)]
    domains: String,
    #[serde(default)]
    kind: FilterRecordKind,
}

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum FilterRecordKind {
    #[default]
    Hide,
    Exception,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            filters,
            domain,
            specific_only,
            selectors,
        } => cmd_resolve(&filters, &domain, specific_only, selectors),
        Commands::Stats { filters } => cmd_stats(&filters),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_resolver(path: &str) -> Result<Resolver, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;

    let records: Vec<FilterRecord> =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse '{}': {}", path, e))?;

    let mut resolver = Resolver::new();
    for record in records {
        let filter = match record.kind {
            FilterRecordKind::Hide => Filter::hiding(&record.domains, &record.selector),
            FilterRecordKind::Exception => Filter::exception(&record.domains, &record.selector),
        };
        resolver.add(filter);
    }

    Ok(resolver)
}

fn cmd_resolve(
    filters: &str,
    domain: &str,
    specific_only: bool,
    selectors: bool,
) -> Result<(), String> {
    let resolver = load_resolver(filters)?;

    let start = Instant::now();
    let sheet = resolver.style_sheet_for_domain(domain, specific_only, selectors);
    let elapsed = start.elapsed();

    if selectors {
        for selector in &sheet.selectors {
            println!("{selector}");
        }
    } else {
        print!("{}", sheet.code);
    }

    eprintln!("Resolved in {:?}", elapsed);
    Ok(())
}

fn cmd_stats(filters: &str) -> Result<(), String> {
    let resolver = load_resolver(filters)?;

    println!("Hiding filters:     {}", resolver.filters().filter_count());
    println!("  domain buckets:   {}", resolver.filters().domain_count());
    println!("Exception filters:  {}", resolver.exceptions().filter_count());
    println!("  domain buckets:   {}", resolver.exceptions().domain_count());

    Ok(())
}
