//! `medifind search` command.
//!
//! Runs the core search pipeline against the loaded dataset and prints the
//! rows cheapest first, as a table or as the same JSON the HTTP API returns.

use anyhow::Result;

use medifind_core::search::{search_medicines, SearchRequest};
use medifind_core::Dataset;

/// CLI entry point for `medifind search <query>`.
pub fn run_search(dataset: &Dataset, query: &str, location: Option<&str>, json: bool) -> Result<()> {
    let rows = search_medicines(
        dataset,
        &SearchRequest {
            query: Some(query),
            location,
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!(
        "{:<22} {:<18} {:<24} {:<16} {:>8}  AVAILABILITY",
        "MEDICINE", "GENERIC", "PHARMACY", "LOCATION", "PRICE"
    );
    for row in &rows {
        println!(
            "{:<22} {:<18} {:<24} {:<16} {:>8.2}  {}",
            row.medicine_name,
            row.generic_name,
            row.pharmacy_name,
            row.location,
            row.price,
            row.availability.as_str()
        );
    }

    Ok(())
}
