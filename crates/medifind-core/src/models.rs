//! Core data models shared by the dataset, search pipeline, and HTTP layer.
//!
//! Field names serialize in camelCase to match the JSON API shape.

use serde::{Deserialize, Serialize};

/// A pharmacy that can stock medicines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    /// Free-text city or region.
    pub location: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// A medicine known to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    /// Medicines sharing a generic name are treated as substitutes.
    pub generic_name: String,
}

/// Stock level of a medicine at a pharmacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    LowStock,
    OutOfStock,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "in_stock",
            Availability::LowStock => "low_stock",
            Availability::OutOfStock => "out_of_stock",
        }
    }
}

/// Price and availability of one medicine at one pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub pharmacy_id: String,
    pub medicine_id: String,
    pub price: f64,
    pub availability: Availability,
}

/// An inventory row joined with its medicine and pharmacy.
///
/// Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRow {
    pub medicine_id: String,
    pub medicine_name: String,
    pub generic_name: String,
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub location: String,
    pub price: f64,
    pub availability: Availability,
}

impl SearchResultRow {
    pub fn project(
        medicine: &Medicine,
        pharmacy: &Pharmacy,
        price: f64,
        availability: Availability,
    ) -> Self {
        Self {
            medicine_id: medicine.id.clone(),
            medicine_name: medicine.name.clone(),
            generic_name: medicine.generic_name.clone(),
            pharmacy_id: pharmacy.id.clone(),
            pharmacy_name: pharmacy.name.clone(),
            location: pharmacy.location.clone(),
            price,
            availability,
        }
    }
}

/// A suggested substitute medicine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSuggestion {
    pub name: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_savings_percent: Option<u32>,
}
