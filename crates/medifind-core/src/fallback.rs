//! Synthetic price fallback.
//!
//! When a location has pharmacies but none of them stock a matching
//! medicine, plausible rows are synthesized so the caller still sees a price
//! range. Output is a pure function of the dataset and the
//! (pharmacy, medicine) ids and is never written back into the dataset.
//!
//! # Algorithm
//!
//! 1. Base price: median of every inventory price for the medicine
//!    (ascending sort, index `n / 2`), or [`DEFAULT_BASE_PRICE`] when the
//!    medicine is not stocked anywhere.
//! 2. Variance: polynomial hash of `"{pharmacy_id}-{medicine_id}"`
//!    (`h = h * 31 + code_unit`, wrapping at 32 bits), then `h % 15 - 7`,
//!    giving a percentage in `[-7, 7]`.
//! 3. Price: `base * (1 + variance / 100)`, rounded to 2 decimals.
//! 4. Availability: `low_stock` if `|variance| > 5`, else `in_stock`.
//! 5. Rows are sorted by price ascending.

use crate::dataset::Dataset;
use crate::models::{Availability, Medicine, Pharmacy, SearchResultRow};
use crate::search::sort_by_price;

/// Base price used for a medicine with no inventory rows at all.
pub const DEFAULT_BASE_PRICE: f64 = 25.0;

/// Largest absolute variance percentage the hash can produce.
pub const MAX_VARIANCE_PERCENT: i32 = 7;

const LOW_STOCK_ABOVE: i32 = 5;

/// 31-multiplier polynomial hash over UTF-16 code units, wrapping at `u32`.
pub fn pair_hash(pharmacy_id: &str, medicine_id: &str) -> u32 {
    format!("{}-{}", pharmacy_id, medicine_id)
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Deterministic price variance in percent, within `[-7, 7]`.
pub fn variance_percent(pharmacy_id: &str, medicine_id: &str) -> i32 {
    let span = (2 * MAX_VARIANCE_PERCENT + 1) as u32;
    (pair_hash(pharmacy_id, medicine_id) % span) as i32 - MAX_VARIANCE_PERCENT
}

/// Median inventory price of a medicine across all pharmacies.
pub fn base_price(dataset: &Dataset, medicine_id: &str) -> f64 {
    let mut prices: Vec<f64> = dataset
        .inventory()
        .iter()
        .filter(|item| item.medicine_id == medicine_id)
        .map(|item| item.price)
        .collect();
    if prices.is_empty() {
        return DEFAULT_BASE_PRICE;
    }
    prices.sort_by(f64::total_cmp);
    prices[prices.len() / 2]
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Synthesize one row per (pharmacy, medicine) pair, cheapest first.
///
/// Returns an empty list when either side is empty.
pub fn synthesize(
    dataset: &Dataset,
    pharmacies: &[&Pharmacy],
    medicines: &[&Medicine],
) -> Vec<SearchResultRow> {
    let mut rows = Vec::with_capacity(pharmacies.len() * medicines.len());
    for pharmacy in pharmacies {
        for medicine in medicines {
            let variance = variance_percent(&pharmacy.id, &medicine.id);
            let base = base_price(dataset, &medicine.id);
            let price = round_cents(base * (1.0 + f64::from(variance) / 100.0));
            let availability = if variance.abs() > LOW_STOCK_ABOVE {
                Availability::LowStock
            } else {
                Availability::InStock
            };
            rows.push(SearchResultRow::project(medicine, pharmacy, price, availability));
        }
    }
    sort_by_price(&mut rows);
    rows
}
