//! Pharmacy lookup by location.

use crate::dataset::Dataset;
use crate::models::Pharmacy;
use crate::normalize::{contains_normalized, normalize};

/// Pharmacies whose location contains `location` (normalized substring).
///
/// A missing or blank location returns every pharmacy. Dataset order is
/// preserved either way.
pub fn find_pharmacies<'a>(dataset: &'a Dataset, location: Option<&str>) -> Vec<&'a Pharmacy> {
    let wanted = normalize(location);
    dataset
        .pharmacies()
        .iter()
        .filter(|p| wanted.is_empty() || contains_normalized(&p.location, &wanted))
        .collect()
}
