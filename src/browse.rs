//! Catalog browsing commands: `list`, `filter`, `reset`, and `state`.
//!
//! Each command mounts the catalog with a full fetch from the configured
//! product service, then drives it the same way the storefront page does.
//! Applied selections and sort are remembered in the state file so
//! `shelf list --saved` can pick up where the last `filter` left off.

use anyhow::Result;
use std::sync::Arc;

use shelf_core::catalog::Catalog;
use shelf_core::events::{CatalogCommand, CatalogView};
use shelf_core::gateway::CatalogGateway;
use shelf_core::kv::{KeyValueStore, ViewState};
use shelf_core::models::{Facet, FacetSelection, SortState};
use shelf_core::selection::FilterPanel;

use crate::config::Config;
use crate::driver::spawn_catalog;
use crate::gateway_http::HttpGateway;
use crate::render::print_view;
use crate::store::JsonFileStore;

/// Facet labels and view options gathered from the command line.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    pub brands: Vec<String>,
    pub colors: Vec<String>,
    pub prices: Vec<String>,
    pub sort: Option<SortState>,
    pub search: Option<String>,
    pub json: bool,
}

impl BrowseOptions {
    fn labels(&self) -> [(Facet, &[String]); 3] {
        [
            (Facet::Brand, self.brands.as_slice()),
            (Facet::Color, self.colors.as_slice()),
            (Facet::Price, self.prices.as_slice()),
        ]
    }
}

fn connect(config: &Config) -> Result<Arc<dyn CatalogGateway>> {
    Ok(Arc::new(HttpGateway::new(&config.gateway)?))
}

async fn mount(gateway: &dyn CatalogGateway) -> Catalog {
    let (catalog, notice) = Catalog::mount(gateway).await;
    if let Some(notice) = notice {
        eprintln!("notice: {}", notice);
    }
    catalog
}

/// Show the canonical catalog, optionally sorted and searched.
///
/// With `saved`, the persisted selection and sort are re-applied first.
pub async fn run_list(config: &Config, opts: &BrowseOptions, saved: bool) -> Result<()> {
    let gateway = connect(config)?;
    let store = JsonFileStore::new(&config.state.path);

    let (selection, stored_sort) = if saved {
        let state = ViewState::load(&store)?;
        (state.applied, Some(state.sort))
    } else {
        (FacetSelection::default(), None)
    };

    let sort = opts
        .sort
        .or(stored_sort)
        .unwrap_or_else(|| config.display.sort_state());

    let mut catalog = mount(gateway.as_ref()).await;
    let completion = catalog.apply_filter(gateway.as_ref(), &selection).await;
    catalog.set_sort(sort);
    if let Some(term) = &opts.search {
        catalog.set_search(term);
    }

    print_view(&catalog.view(completion.notice().cloned()), opts.json);
    Ok(())
}

/// Stage the requested facet labels, apply them, and print the result.
pub async fn run_filter(config: &Config, opts: &BrowseOptions) -> Result<()> {
    let gateway = connect(config)?;
    let store = JsonFileStore::new(&config.state.path);
    let catalog = mount(gateway.as_ref()).await;

    let mut panel = FilterPanel::new();
    let first = opts
        .labels()
        .into_iter()
        .find(|(_, labels)| !labels.is_empty())
        .map(|(facet, _)| facet);
    if let Some(facet) = first {
        panel.open_panel(facet);
    }
    for (facet, labels) in opts.labels() {
        for label in labels {
            if !panel.staged().get(facet).contains(label.trim()) {
                panel.toggle(facet, label);
            }
        }
    }

    let sort = opts.sort.unwrap_or_else(|| config.display.sort_state());
    let mut commands = vec![panel.apply(), CatalogCommand::Sort(sort)];
    if let Some(term) = &opts.search {
        commands.push(CatalogCommand::Search(term.clone()));
    }

    let views = drive(gateway, catalog, commands).await;
    let mut last: Option<CatalogView> = None;
    for view in views {
        if let Some(notice) = &view.notice {
            eprintln!("notice: {}", notice);
        }
        last = Some(view);
    }

    if let Some(mut view) = last {
        view.notice = None;
        print_view(&view, opts.json);
        ViewState {
            applied: panel.applied().clone(),
            sort: view.sort,
        }
        .save(&store)?;
    }
    Ok(())
}

/// Send `commands` through the catalog driver and collect every view it emits.
pub async fn drive(
    gateway: Arc<dyn CatalogGateway>,
    catalog: Catalog,
    commands: Vec<CatalogCommand>,
) -> Vec<CatalogView> {
    let (tx, mut rx, handle) = spawn_catalog(gateway, catalog, commands.len().max(1) * 4);

    let sender = tokio::spawn(async move {
        for command in commands {
            if tx.send(command).await.is_err() {
                break;
            }
        }
    });

    let mut views = Vec::new();
    while let Some(view) = rx.recv().await {
        views.push(view);
    }

    if let Err(e) = sender.await {
        tracing::warn!(error = %e, "command sender failed");
    }
    if let Err(e) = handle.await {
        tracing::warn!(error = %e, "catalog driver failed");
    }
    views
}

/// Forget the saved selection and sort and show the canonical catalog.
pub async fn run_reset(config: &Config, json: bool) -> Result<()> {
    let store = JsonFileStore::new(&config.state.path);
    ViewState::clear(&store)?;

    let gateway = connect(config)?;
    let catalog = mount(gateway.as_ref()).await;
    print_view(&catalog.view(None), json);
    Ok(())
}

/// Print the saved selection and sort.
pub fn run_state(config: &Config) -> Result<()> {
    let store = JsonFileStore::new(&config.state.path);
    print_state(&store)
}

fn print_state(store: &dyn KeyValueStore) -> Result<()> {
    let state = ViewState::load(store)?;
    let out = serde_json::json!({
        "applied": state.applied,
        "sort": state.sort,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
