//! # Shelf
//!
//! Storefront catalog filter, sort, and search pipeline.
//!
//! Shelf mounts a product catalog from a remote product service, lets the
//! user stage facet selections (brand, color, price) and apply them through
//! the service's filter endpoint, and sorts and searches the result
//! client-side. Failed filter calls fall back to the full catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  CatalogCommand  ┌──────────────┐   HTTP    ┌──────────────┐
//! │ FilterPanel  │─────────────────▶│   driver     │──────────▶│   product    │
//! │ staged/apply │                  │   Catalog    │◀──────────│   service    │
//! └──────────────┘◀─────────────────└──────────────┘           └──────────────┘
//!                     CatalogView
//! ```
//!
//! The pipeline logic lives in the I/O-free `shelf-core` crate; this crate
//! adds configuration, the HTTP gateway, the state file, the async driver,
//! and the `shelf` CLI.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`gateway_http`] | reqwest client for the product service |
//! | [`store`] | JSON file key-value store |
//! | [`driver`] | Channel-driven catalog task |
//! | [`browse`] | `list` / `filter` / `reset` / `state` commands |
//! | [`render`] | Terminal output |

pub mod browse;
pub mod config;
pub mod driver;
pub mod gateway_http;
pub mod render;
pub mod store;

pub use shelf_core;
