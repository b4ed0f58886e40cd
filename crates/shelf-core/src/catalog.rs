//! Catalog orchestrator.
//!
//! [`Catalog`] owns the canonical product list and derives the displayed
//! list from it. Every change flows through the same derivation:
//!
//! ```text
//! base (canonical | remote filter result) → sort → search → displayed
//! ```
//!
//! # Filter state machine
//!
//! ```text
//!            begin_filter (non-empty)          complete Ok
//!   Idle ─────────────────────────▶ Filtering ───────────▶ Filtered
//!    ▲                                  │                     │
//!    │        complete Err (fallback)   │                     │
//!    ├──────────────────────────────────┘                     │
//!    └──────────────── reset / empty selection ───────────────┘
//! ```
//!
//! Network calls are split into `begin_*` (synchronous, returns a
//! [`Pending`] call) and [`complete`](Catalog::complete) so a driver can
//! keep several calls in flight. Each begin bumps a monotonic request id;
//! completions carrying an older id are reported as [`Completion::Stale`]
//! and leave the catalog untouched.
//!
//! Gateway failures never escape: they become a [`Notice`] and the
//! canonical list is shown instead.

use std::fmt;

use serde::Serialize;

use crate::events::{CatalogCommand, CatalogView};
use crate::facets::{translate_facet_map, FacetMap};
use crate::gateway::{CatalogGateway, GatewayError};
use crate::models::{FacetSelection, Product, SortState};
use crate::search::apply_search;
use crate::sort::sort_products;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPhase {
    /// Displaying the canonical list.
    Idle,
    /// A remote filter call is in flight.
    Filtering,
    /// Displaying a remote filter result.
    Filtered,
}

/// User-facing message produced by an orchestrator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The filter succeeded but matched nothing.
    NoResults,
    /// The filter call failed; the canonical list is shown.
    FilterFailed(GatewayError),
    /// Refetching the canonical list failed; the previous one is kept.
    RefreshFailed(GatewayError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoResults => f.write_str("No products match the selected filters."),
            Notice::FilterFailed(err) => write!(
                f,
                "Could not apply filters, showing the full catalog instead ({}).",
                err
            ),
            Notice::RefreshFailed(err) => write!(
                f,
                "Could not load the catalog, showing the last loaded list ({}).",
                err
            ),
        }
    }
}

/// Outcome of a gateway call once a fallback list has been chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Ok(Vec<Product>),
    Fallback(Vec<Product>, GatewayError),
}

impl Resolution {
    pub fn resolve(result: Result<Vec<Product>, GatewayError>, fallback: &[Product]) -> Self {
        match result {
            Ok(list) => Resolution::Ok(list),
            Err(err) => Resolution::Fallback(fallback.to_vec(), err),
        }
    }
}

/// A gateway call the catalog is waiting on.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    Filter { id: u64, facets: FacetMap },
    Refresh { id: u64 },
}

impl Pending {
    pub fn id(&self) -> u64 {
        match self {
            Pending::Filter { id, .. } | Pending::Refresh { id } => *id,
        }
    }

    /// Issue the call against `gateway`.
    pub async fn call(&self, gateway: &dyn CatalogGateway) -> Result<Vec<Product>, GatewayError> {
        match self {
            Pending::Filter { facets, .. } => gateway.filter_products(facets).await,
            Pending::Refresh { .. } => gateway.fetch_products().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The displayed list was updated.
    Applied,
    /// The displayed list was updated and the user should see a notice.
    Notice(Notice),
    /// A newer request superseded this one; nothing changed.
    Stale,
}

impl Completion {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Completion::Notice(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    canonical: Vec<Product>,
    base: Vec<Product>,
    displayed: Vec<Product>,
    sort: SortState,
    search_term: String,
    phase: FilterPhase,
    latest_request: u64,
}

impl Catalog {
    pub fn new(canonical: Vec<Product>) -> Self {
        Self {
            base: canonical.clone(),
            displayed: canonical.clone(),
            canonical,
            sort: SortState::default(),
            search_term: String::new(),
            phase: FilterPhase::Idle,
            latest_request: 0,
        }
    }

    /// Build a catalog from an unconditional full fetch.
    ///
    /// A failed fetch yields an empty catalog and a notice.
    pub async fn mount(gateway: &dyn CatalogGateway) -> (Self, Option<Notice>) {
        match gateway.fetch_products().await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "catalog mounted");
                (Self::new(products), None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "initial catalog fetch failed");
                (Self::new(Vec::new()), Some(Notice::RefreshFailed(err)))
            }
        }
    }

    pub fn canonical(&self) -> &[Product] {
        &self.canonical
    }

    pub fn displayed(&self) -> &[Product] {
        &self.displayed
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    pub fn view(&self, notice: Option<Notice>) -> CatalogView {
        CatalogView {
            products: self.displayed.clone(),
            phase: self.phase,
            sort: self.sort,
            search_term: self.search_term.clone(),
            notice,
        }
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.recompute();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.recompute();
    }

    /// Apply a local command, returning the gateway call it needs, if any.
    pub fn dispatch(&mut self, command: CatalogCommand) -> Option<Pending> {
        match command {
            CatalogCommand::FilterCommitted(selection) => self.begin_filter(&selection),
            CatalogCommand::FilterReset => Some(self.begin_refresh()),
            CatalogCommand::Search(term) => {
                self.set_search(&term);
                None
            }
            CatalogCommand::Sort(sort) => {
                self.set_sort(sort);
                None
            }
        }
    }

    /// Start filtering by `selection`.
    ///
    /// An all-empty selection short-circuits to the canonical list without
    /// a gateway call and returns `None`.
    pub fn begin_filter(&mut self, selection: &FacetSelection) -> Option<Pending> {
        let facets = translate_facet_map(selection);
        let id = self.next_request_id();
        if facets.is_empty() {
            tracing::debug!("empty facet map; showing canonical list");
            self.show_canonical();
            return None;
        }
        tracing::debug!(request = id, ?facets, "filter requested");
        self.phase = FilterPhase::Filtering;
        Some(Pending::Filter { id, facets })
    }

    /// Start a reset: clear search and sort, show the canonical list in
    /// fetch order, and request a fresh full fetch.
    pub fn begin_refresh(&mut self) -> Pending {
        let id = self.next_request_id();
        self.sort = SortState::default();
        self.search_term.clear();
        self.show_canonical();
        tracing::debug!(request = id, "catalog refresh requested");
        Pending::Refresh { id }
    }

    /// Apply the result of a pending call.
    pub fn complete(
        &mut self,
        pending: &Pending,
        result: Result<Vec<Product>, GatewayError>,
    ) -> Completion {
        if pending.id() != self.latest_request {
            tracing::debug!(
                request = pending.id(),
                latest = self.latest_request,
                "dropping stale response"
            );
            return Completion::Stale;
        }
        match pending {
            Pending::Filter { .. } => self.complete_filter(result),
            Pending::Refresh { .. } => self.complete_refresh(result),
        }
    }

    fn complete_filter(&mut self, result: Result<Vec<Product>, GatewayError>) -> Completion {
        match Resolution::resolve(result, &self.canonical) {
            Resolution::Ok(list) => {
                let empty = list.is_empty();
                self.base = list;
                self.phase = FilterPhase::Filtered;
                self.recompute();
                if empty {
                    Completion::Notice(Notice::NoResults)
                } else {
                    Completion::Applied
                }
            }
            Resolution::Fallback(list, reason) => {
                if let GatewayError::Server { status, body } = &reason {
                    tracing::warn!(status, body = %body, "filter request rejected");
                } else {
                    tracing::warn!(error = %reason, "filter request failed");
                }
                self.base = list;
                self.phase = FilterPhase::Idle;
                self.recompute();
                Completion::Notice(Notice::FilterFailed(reason))
            }
        }
    }

    fn complete_refresh(&mut self, result: Result<Vec<Product>, GatewayError>) -> Completion {
        match Resolution::resolve(result, &self.canonical) {
            Resolution::Ok(list) => {
                self.canonical = list;
                self.show_canonical();
                Completion::Applied
            }
            Resolution::Fallback(list, reason) => {
                tracing::warn!(error = %reason, "catalog refresh failed");
                self.base = list;
                self.phase = FilterPhase::Idle;
                self.recompute();
                Completion::Notice(Notice::RefreshFailed(reason))
            }
        }
    }

    /// Filter by `selection` and wait for the gateway.
    pub async fn apply_filter(
        &mut self,
        gateway: &dyn CatalogGateway,
        selection: &FacetSelection,
    ) -> Completion {
        match self.begin_filter(selection) {
            Some(pending) => {
                let result = pending.call(gateway).await;
                self.complete(&pending, result)
            }
            None => Completion::Applied,
        }
    }

    /// Reset and wait for the refetch.
    pub async fn reset(&mut self, gateway: &dyn CatalogGateway) -> Completion {
        let pending = self.begin_refresh();
        let result = pending.call(gateway).await;
        self.complete(&pending, result)
    }

    fn next_request_id(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    fn show_canonical(&mut self) {
        self.base = self.canonical.clone();
        self.phase = FilterPhase::Idle;
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut list = self.base.clone();
        sort_products(&mut list, self.sort);
        self.displayed = apply_search(&list, &self.search_term);
    }
}
