//! Messages exchanged between the filter sidebar and the catalog.
//!
//! The sidebar never reaches into catalog state: it emits a
//! [`CatalogCommand`], and whoever drives the [`Catalog`](crate::catalog::Catalog)
//! answers with a [`CatalogView`] snapshot.

use serde_json::{json, Value};

use crate::catalog::{FilterPhase, Notice};
use crate::models::{FacetSelection, Product, SortState};

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCommand {
    /// A panel committed a non-empty selection.
    FilterCommitted(FacetSelection),
    /// Selections were cleared; refetch the canonical list.
    FilterReset,
    /// The search box changed.
    Search(String),
    /// The sort control changed.
    Sort(SortState),
}

/// What the page should render after a command or a completed call.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub products: Vec<Product>,
    pub phase: FilterPhase,
    pub sort: SortState,
    pub search_term: String,
    pub notice: Option<Notice>,
}

impl CatalogView {
    pub fn to_json(&self) -> Value {
        json!({
            "phase": self.phase,
            "sort": self.sort,
            "search": self.search_term,
            "notice": self.notice.as_ref().map(|n| n.to_string()),
            "count": self.products.len(),
            "products": self.products,
        })
    }
}
