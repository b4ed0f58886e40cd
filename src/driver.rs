//! Async driver that owns a [`Catalog`] and serves it over channels.
//!
//! The page or sidebar sends [`CatalogCommand`]s; the driver answers every
//! command and every completed gateway call with a [`CatalogView`]. Local
//! commands (search, sort) are answered immediately. Gateway calls run
//! concurrently in a [`JoinSet`], so a slow filter never blocks a
//! keystroke, and the catalog's request-id guard discards responses that
//! were overtaken by a newer filter or reset.
//!
//! The driver stops once the command channel is closed and every in-flight
//! call has resolved, returning the final catalog.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use shelf_core::catalog::{Catalog, Completion, Pending};
use shelf_core::events::{CatalogCommand, CatalogView};
use shelf_core::gateway::{CatalogGateway, GatewayError};
use shelf_core::models::Product;

type CallOutcome = (Pending, Result<Vec<Product>, GatewayError>);

pub async fn run_catalog(
    gateway: Arc<dyn CatalogGateway>,
    mut catalog: Catalog,
    mut commands: mpsc::Receiver<CatalogCommand>,
    views: mpsc::Sender<CatalogView>,
) -> Catalog {
    let mut inflight: JoinSet<CallOutcome> = JoinSet::new();
    let mut commands_open = true;

    loop {
        tokio::select! {
            command = commands.recv(), if commands_open => {
                let Some(command) = command else {
                    commands_open = false;
                    continue;
                };
                if let Some(pending) = catalog.dispatch(command) {
                    let gateway = gateway.clone();
                    inflight.spawn(async move {
                        let result = pending.call(gateway.as_ref()).await;
                        (pending, result)
                    });
                }
                publish(&views, catalog.view(None)).await;
            }
            Some(joined) = inflight.join_next() => {
                let (pending, result) = match joined {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        tracing::warn!(error = %err, "gateway task aborted");
                        continue;
                    }
                };
                match catalog.complete(&pending, result) {
                    Completion::Stale => {}
                    Completion::Applied => {
                        publish(&views, catalog.view(None)).await;
                    }
                    Completion::Notice(notice) => {
                        publish(&views, catalog.view(Some(notice))).await;
                    }
                }
            }
            else => break,
        }
    }

    catalog
}

async fn publish(views: &mpsc::Sender<CatalogView>, view: CatalogView) {
    if views.send(view).await.is_err() {
        tracing::debug!("view receiver closed, dropping view");
    }
}

/// Spawn [`run_catalog`] on the current runtime and return its channels.
pub fn spawn_catalog(
    gateway: Arc<dyn CatalogGateway>,
    catalog: Catalog,
    buffer: usize,
) -> (
    mpsc::Sender<CatalogCommand>,
    mpsc::Receiver<CatalogView>,
    tokio::task::JoinHandle<Catalog>,
) {
    let (command_tx, command_rx) = mpsc::channel(buffer);
    let (view_tx, view_rx) = mpsc::channel(buffer);
    let handle = tokio::spawn(run_catalog(gateway, catalog, command_rx, view_tx));
    (command_tx, view_rx, handle)
}
