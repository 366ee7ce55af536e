//! `medifind alternatives` command.
//!
//! Prints substitute suggestions for a medicine. Savings percentages are
//! drawn from the thread-local RNG, so they differ between runs.

use anyhow::Result;

use medifind_core::alternatives::suggest_alternatives;
use medifind_core::Dataset;

/// CLI entry point for `medifind alternatives <name>`.
pub fn run_alternatives(dataset: &Dataset, name: &str, json: bool) -> Result<()> {
    let suggestions = suggest_alternatives(dataset, Some(name), &mut rand::thread_rng())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No alternatives.");
        return Ok(());
    }

    for (i, s) in suggestions.iter().enumerate() {
        match s.estimated_savings_percent {
            Some(pct) => println!("{}. {} (~{}% savings)", i + 1, s.name, pct),
            None => println!("{}. {}", i + 1, s.name),
        }
        println!("    {}", s.reason);
    }

    Ok(())
}
