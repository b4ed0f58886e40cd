//! # Shelf Core
//!
//! Shared, I/O-free logic for the storefront catalog pipeline: product
//! models, the facet code table, comparators, the search predicate, the
//! staged/applied filter selection model, and the catalog orchestrator.
//!
//! This crate contains no tokio, reqwest, or filesystem dependencies. The
//! remote product service and the keyed persistent store are reached only
//! through the [`gateway::CatalogGateway`] and [`kv::KeyValueStore`] traits.

pub mod catalog;
pub mod events;
pub mod facets;
pub mod gateway;
pub mod kv;
pub mod models;
pub mod search;
pub mod selection;
pub mod sort;
