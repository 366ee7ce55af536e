//! Substitute suggestions ("AI alternatives").
//!
//! A deterministic heuristic with a randomized savings estimate:
//!
//! 1. Find the medicine whose normalized name equals the normalized input.
//!    Suggest up to three *other* medicines with exactly the same
//!    `generic_name` (raw, case-sensitive comparison), each with a savings
//!    estimate in `[10, 34]`.
//! 2. If that yields nothing, suggest up to three medicines whose normalized
//!    name or generic name contains the input, with savings in `[5, 24]`.
//!
//! The random source is passed in so callers and tests control it.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::dataset::Dataset;
use crate::error::{MediFindError, Result, MISSING_NAME};
use crate::models::{AlternativeSuggestion, Medicine};
use crate::normalize::{contains_normalized, normalize};

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 3;

/// Savings range for medicines sharing a generic name.
pub const GENERIC_SAVINGS: RangeInclusive<u32> = 10..=34;

/// Savings range for name-similarity matches.
pub const SIMILAR_NAME_SAVINGS: RangeInclusive<u32> = 5..=24;

/// Reason attached to name-similarity matches.
pub const SIMILAR_NAME_REASON: &str = "Potential substitute based on name similarity";

/// Suggest up to [`MAX_SUGGESTIONS`] substitutes for `name`.
pub fn suggest_alternatives<R: Rng>(
    dataset: &Dataset,
    name: Option<&str>,
    rng: &mut R,
) -> Result<Vec<AlternativeSuggestion>> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return Err(MediFindError::validation(MISSING_NAME));
    }

    let direct = dataset
        .medicines()
        .iter()
        .find(|m| normalize(Some(&m.name)) == wanted);

    if let Some(direct) = direct {
        let siblings: Vec<AlternativeSuggestion> = generic_siblings(dataset, direct)
            .take(MAX_SUGGESTIONS)
            .map(|m| AlternativeSuggestion {
                name: m.name.clone(),
                reason: format!("Shares generic {}.", m.generic_name),
                estimated_savings_percent: Some(rng.gen_range(GENERIC_SAVINGS)),
            })
            .collect();
        if !siblings.is_empty() {
            return Ok(siblings);
        }
    }

    Ok(dataset
        .medicines()
        .iter()
        .filter(|m| {
            contains_normalized(&m.generic_name, &wanted) || contains_normalized(&m.name, &wanted)
        })
        .take(MAX_SUGGESTIONS)
        .map(|m| AlternativeSuggestion {
            name: m.name.clone(),
            reason: SIMILAR_NAME_REASON.to_string(),
            estimated_savings_percent: Some(rng.gen_range(SIMILAR_NAME_SAVINGS)),
        })
        .collect())
}

// Exact string equality on generic_name; the direct match above is normalized.
fn generic_siblings<'a>(
    dataset: &'a Dataset,
    direct: &'a Medicine,
) -> impl Iterator<Item = &'a Medicine> + 'a {
    dataset
        .medicines()
        .iter()
        .filter(move |m| m.generic_name == direct.generic_name && m.id != direct.id)
}
