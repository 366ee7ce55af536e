//! # MediFind Core
//!
//! Pure, synchronous search logic for MediFind: data models, the immutable
//! dataset snapshot, string normalization, pharmacy lookup, the medicine
//! search pipeline with its synthetic price fallback, and the substitute
//! suggestion heuristic.
//!
//! This crate contains no tokio, axum, or filesystem I/O. Callers build a
//! [`dataset::Dataset`] once and pass it by reference into every operation.

pub mod alternatives;
pub mod dataset;
pub mod error;
pub mod fallback;
pub mod models;
pub mod normalize;
pub mod pharmacy;
pub mod search;

pub use dataset::Dataset;
pub use error::{MediFindError, Result};
