//! Dataset loading.
//!
//! Builds the immutable [`Dataset`] snapshot once at startup, either from
//! the JSON files in `[data].dir` or from the mock data compiled into the
//! binary. Used by both the HTTP server and every CLI command.
//!
//! | File | Contents |
//! |------|----------|
//! | `pharmacies.json` | Array of pharmacies |
//! | `medicines.json` | Array of medicines |
//! | `inventory.json` | Array of (pharmacy, medicine, price, availability) rows |

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, warn};

use medifind_core::Dataset;

use crate::config::Config;

pub const PHARMACIES_FILE: &str = "pharmacies.json";
pub const MEDICINES_FILE: &str = "medicines.json";
pub const INVENTORY_FILE: &str = "inventory.json";

const EMBEDDED_PHARMACIES: &str = include_str!("../data/pharmacies.json");
const EMBEDDED_MEDICINES: &str = include_str!("../data/medicines.json");
const EMBEDDED_INVENTORY: &str = include_str!("../data/inventory.json");

/// Load the dataset configured in `config`.
pub fn load_dataset(config: &Config) -> Result<Dataset> {
    let dataset = match &config.data.dir {
        Some(dir) => load_from_dir(dir)?,
        None => load_embedded()?,
    };

    info!(
        pharmacies = dataset.pharmacies().len(),
        medicines = dataset.medicines().len(),
        inventory = dataset.inventory().len(),
        "dataset loaded"
    );
    for d in dataset.dangling_references() {
        warn!(row = d.row, kind = %d.kind, id = %d.id, "inventory row references unknown id");
    }

    Ok(dataset)
}

/// Parse the three JSON files in `dir`.
pub fn load_from_dir(dir: &Path) -> Result<Dataset> {
    let pharmacies = read_json(&dir.join(PHARMACIES_FILE))?;
    let medicines = read_json(&dir.join(MEDICINES_FILE))?;
    let inventory = read_json(&dir.join(INVENTORY_FILE))?;
    Dataset::new(pharmacies, medicines, inventory)
        .with_context(|| format!("Invalid dataset in {}", dir.display()))
}

/// Parse the mock data bundled with the binary.
pub fn load_embedded() -> Result<Dataset> {
    let pharmacies = parse_json(EMBEDDED_PHARMACIES, PHARMACIES_FILE)?;
    let medicines = parse_json(EMBEDDED_MEDICINES, MEDICINES_FILE)?;
    let inventory = parse_json(EMBEDDED_INVENTORY, INVENTORY_FILE)?;
    Dataset::new(pharmacies, medicines, inventory).context("Invalid embedded dataset")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    parse_json(&content, &path.display().to_string())
}

fn parse_json<T: DeserializeOwned>(content: &str, name: &str) -> Result<T> {
    serde_json::from_str(content).with_context(|| format!("Failed to parse {}", name))
}
