//! `medifind pharmacies` command.

use anyhow::Result;

use medifind_core::pharmacy::find_pharmacies;
use medifind_core::Dataset;

/// CLI entry point for `medifind pharmacies [--location L]`.
pub fn run_pharmacies(dataset: &Dataset, location: Option<&str>, json: bool) -> Result<()> {
    let found = find_pharmacies(dataset, location);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No pharmacies.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<16} {:>8}  ADDRESS", "ID", "NAME", "LOCATION", "KM");
    for p in &found {
        let distance = p
            .distance_km
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<24} {:<16} {:>8}  {}",
            p.id, p.name, p.location, distance, p.address
        );
    }

    Ok(())
}
