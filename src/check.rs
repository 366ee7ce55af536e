//! `medifind check` command.
//!
//! Loads the configured dataset and reports collection sizes and any
//! inventory rows whose pharmacy or medicine id does not resolve. Such rows
//! make any search that touches them fail with a 500.

use anyhow::{bail, Result};

use medifind_core::Dataset;

/// CLI entry point for `medifind check`.
pub fn run_check(dataset: &Dataset) -> Result<()> {
    println!("pharmacies: {}", dataset.pharmacies().len());
    println!("medicines:  {}", dataset.medicines().len());
    println!("inventory:  {}", dataset.inventory().len());

    let dangling = dataset.dangling_references();
    if dangling.is_empty() {
        println!("ok");
        return Ok(());
    }

    println!();
    println!("{:<6} {:<10} ID", "ROW", "KIND");
    for d in &dangling {
        println!("{:<6} {:<10} {}", d.row, d.kind, d.id);
    }
    bail!("{} dangling inventory reference(s)", dangling.len())
}
