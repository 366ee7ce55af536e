//! Medicine search pipeline.
//!
//! Matches a query against medicine names and generic names, joins the
//! matches against inventory and pharmacies, filters by location, and
//! sorts by price.
//!
//! # Matching
//!
//! A medicine matches when its normalized name or generic name contains the
//! normalized query, or when every query token is a substring of one of
//! those two fields. The token branch lets `"para tab"` find
//! `"Paracetamol Tablet"`.
//!
//! # Fallback
//!
//! If the join yields nothing and a location was given, rows are
//! synthesized for the matched medicines at that location's pharmacies
//! (see [`crate::fallback`]).

use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::error::{MediFindError, Result, MISSING_QUERY};
use crate::fallback;
use crate::models::{Medicine, SearchResultRow};
use crate::normalize::{contains_normalized, normalize, tokenize};
use crate::pharmacy::find_pharmacies;

/// Bundles the inputs of one search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchRequest<'a> {
    /// Required query text.
    pub query: Option<&'a str>,
    /// Optional location substring.
    pub location: Option<&'a str>,
}

/// True if `medicine` matches the normalized query or all of its tokens.
pub fn medicine_matches(medicine: &Medicine, query: &str, tokens: &[String]) -> bool {
    let name = normalize(Some(&medicine.name));
    let generic = normalize(Some(&medicine.generic_name));
    if name.contains(query) || generic.contains(query) {
        return true;
    }
    !tokens.is_empty()
        && tokens
            .iter()
            .all(|t| name.contains(t.as_str()) || generic.contains(t.as_str()))
}

/// Medicines matching `query`, in dataset order.
pub fn matching_medicines<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a Medicine> {
    let normalized = normalize(Some(query));
    let tokens = tokenize(Some(query));
    dataset
        .medicines()
        .iter()
        .filter(|m| medicine_matches(m, &normalized, &tokens))
        .collect()
}

/// Stable ascending sort on price.
pub fn sort_by_price(rows: &mut [SearchResultRow]) {
    rows.sort_by(|a, b| a.price.total_cmp(&b.price));
}

/// Run the full search pipeline.
///
/// Fails with a validation error when the query is missing or blank, and
/// with a dangling-reference error when a matched inventory row points at
/// an unknown medicine or pharmacy.
pub fn search_medicines(dataset: &Dataset, req: &SearchRequest<'_>) -> Result<Vec<SearchResultRow>> {
    let query = normalize(req.query);
    if query.is_empty() {
        return Err(MediFindError::validation(MISSING_QUERY));
    }
    let location = normalize(req.location);

    let matched = matching_medicines(dataset, &query);
    let matched_ids: HashSet<&str> = matched.iter().map(|m| m.id.as_str()).collect();

    let mut rows = Vec::new();
    for item in dataset.inventory() {
        if !matched_ids.contains(item.medicine_id.as_str()) {
            continue;
        }
        let (medicine, pharmacy) = dataset.resolve(item)?;
        rows.push(SearchResultRow::project(
            medicine,
            pharmacy,
            item.price,
            item.availability,
        ));
    }

    if !location.is_empty() {
        rows.retain(|row| contains_normalized(&row.location, &location));
    }
    sort_by_price(&mut rows);

    if rows.is_empty() && !location.is_empty() {
        let pharmacies = find_pharmacies(dataset, Some(&location));
        return Ok(fallback::synthesize(dataset, &pharmacies, &matched));
    }

    Ok(rows)
}
