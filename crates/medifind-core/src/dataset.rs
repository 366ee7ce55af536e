//! Immutable in-memory snapshot of pharmacies, medicines, and inventory.
//!
//! Built once at startup and shared by reference (typically behind an `Arc`)
//! with every request. Nothing in the crate mutates a [`Dataset`] after
//! construction, so concurrent readers need no locking.

use std::collections::HashMap;

use crate::error::{EntityKind, MediFindError, Result};
use crate::models::{InventoryItem, Medicine, Pharmacy};

/// An inventory row whose pharmacy or medicine id does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Position of the row in the inventory collection.
    pub row: usize,
    pub kind: EntityKind,
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pharmacies: Vec<Pharmacy>,
    medicines: Vec<Medicine>,
    inventory: Vec<InventoryItem>,
    pharmacy_index: HashMap<String, usize>,
    medicine_index: HashMap<String, usize>,
}

impl Dataset {
    /// Build a snapshot, indexing pharmacies and medicines by id.
    ///
    /// Fails on a repeated pharmacy or medicine id. Inventory references
    /// are not checked here; see [`Dataset::dangling_references`].
    pub fn new(
        pharmacies: Vec<Pharmacy>,
        medicines: Vec<Medicine>,
        inventory: Vec<InventoryItem>,
    ) -> Result<Self> {
        let pharmacy_index = index_by_id(
            pharmacies.iter().map(|p| p.id.as_str()),
            EntityKind::Pharmacy,
        )?;
        let medicine_index = index_by_id(
            medicines.iter().map(|m| m.id.as_str()),
            EntityKind::Medicine,
        )?;

        Ok(Self {
            pharmacies,
            medicines,
            inventory,
            pharmacy_index,
            medicine_index,
        })
    }

    pub fn pharmacies(&self) -> &[Pharmacy] {
        &self.pharmacies
    }

    pub fn medicines(&self) -> &[Medicine] {
        &self.medicines
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn pharmacy(&self, id: &str) -> Option<&Pharmacy> {
        self.pharmacy_index.get(id).map(|&i| &self.pharmacies[i])
    }

    pub fn medicine(&self, id: &str) -> Option<&Medicine> {
        self.medicine_index.get(id).map(|&i| &self.medicines[i])
    }

    /// Resolve both sides of an inventory row, failing loudly on a dangling id.
    pub fn resolve(&self, item: &InventoryItem) -> Result<(&Medicine, &Pharmacy)> {
        let medicine =
            self.medicine(&item.medicine_id)
                .ok_or_else(|| MediFindError::DanglingReference {
                    kind: EntityKind::Medicine,
                    id: item.medicine_id.clone(),
                })?;
        let pharmacy =
            self.pharmacy(&item.pharmacy_id)
                .ok_or_else(|| MediFindError::DanglingReference {
                    kind: EntityKind::Pharmacy,
                    id: item.pharmacy_id.clone(),
                })?;
        Ok((medicine, pharmacy))
    }

    /// Every inventory reference that does not resolve, in row order.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        for (row, item) in self.inventory.iter().enumerate() {
            if self.medicine(&item.medicine_id).is_none() {
                out.push(DanglingReference {
                    row,
                    kind: EntityKind::Medicine,
                    id: item.medicine_id.clone(),
                });
            }
            if self.pharmacy(&item.pharmacy_id).is_none() {
                out.push(DanglingReference {
                    row,
                    kind: EntityKind::Pharmacy,
                    id: item.pharmacy_id.clone(),
                });
            }
        }
        out
    }
}

fn index_by_id<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: EntityKind,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if index.insert(id.to_string(), i).is_some() {
            return Err(MediFindError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(index)
}
