//! # MediFind
//!
//! Medicine price and availability search across a static set of pharmacies,
//! with synthetic price estimates for unstocked locations and substitute
//! suggestions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │  JSON files  │──▶│  Dataset (core)   │──▶│  HTTP (axum)  │
//! │  or embedded │   │  immutable, Arc   │   │  /api/...     │
//! └──────────────┘   └────────┬─────────┘   └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │     CLI      │
//!                      │  (medifind)  │
//!                      └──────────────┘
//! ```
//!
//! The search logic itself lives in the `medifind-core` crate and is pure
//! and synchronous. This crate adds configuration, dataset loading, the
//! HTTP server, and CLI output.
//!
//! ## Quick Start
//!
//! ```bash
//! medifind serve                                  # start HTTP server on :4000
//! medifind search paracetamol --location boston
//! medifind pharmacies --location "san francisco"
//! medifind alternatives tylenol
//! medifind check                                  # validate dataset references
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration, env overrides, validation |
//! | [`data`] | Dataset loading from JSON files or embedded mock data |
//! | [`server`] | HTTP API (Axum) with CORS and request tracing |
//! | [`search`] | `medifind search` output |
//! | [`pharmacies`] | `medifind pharmacies` output |
//! | [`alternatives`] | `medifind alternatives` output |
//! | [`check`] | `medifind check` dataset integrity report |

pub mod alternatives;
pub mod check;
pub mod config;
pub mod data;
pub mod pharmacies;
pub mod search;
pub mod server;
