//! Filter selection model.
//!
//! A [`FilterPanel`] holds two [`FacetSelection`]s: `staged`, edited live
//! while a facet panel is open, and `applied`, the selection that produced
//! the displayed list. Opening any panel re-seeds `staged` from `applied`
//! for every facet, so leaving a panel without applying discards the edit.
//!
//! Committing or resetting yields a [`CatalogCommand`] for the catalog
//! driver instead of calling back into it.

use crate::events::CatalogCommand;
use crate::models::{Facet, FacetSelection};

#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    staged: FacetSelection,
    applied: FacetSelection,
    open: Option<Facet>,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously applied selection (e.g. restored state).
    pub fn with_applied(applied: FacetSelection) -> Self {
        Self {
            staged: applied.clone(),
            applied,
            open: None,
        }
    }

    pub fn staged(&self) -> &FacetSelection {
        &self.staged
    }

    pub fn applied(&self) -> &FacetSelection {
        &self.applied
    }

    pub fn open_facet(&self) -> Option<Facet> {
        self.open
    }

    /// Open the panel for `facet`, copying `applied` into `staged`.
    pub fn open_panel(&mut self, facet: Facet) {
        self.staged = self.applied.clone();
        self.open = Some(facet);
    }

    pub fn close_panel(&mut self) {
        self.open = None;
    }

    /// Flip membership of `value` in the staged set for `facet`.
    ///
    /// Returns whether the value is selected afterwards. Blank values are
    /// ignored.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let set = self.staged.get_mut(facet);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    /// Commit `staged` as `applied` and close the panel.
    ///
    /// An all-empty commit is the same as [`reset`](Self::reset).
    pub fn apply(&mut self) -> CatalogCommand {
        self.open = None;
        if self.staged.is_empty() {
            return self.reset();
        }
        self.applied = self.staged.clone();
        CatalogCommand::FilterCommitted(self.applied.clone())
    }

    /// Clear both selections. The catalog clears search and sort and
    /// refetches when it receives the returned command.
    pub fn reset(&mut self) -> CatalogCommand {
        self.applied.clear();
        self.staged.clear();
        CatalogCommand::FilterReset
    }

    /// The "all" pseudo-facet: reset and close any open panel.
    pub fn select_all(&mut self) -> CatalogCommand {
        self.open = None;
        self.reset()
    }
}
