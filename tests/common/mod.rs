//! Stub of the remote product service for integration tests.
//!
//! Serves `GET /products` and `POST /products/filter` from a fixed product
//! list on `127.0.0.1:<ephemeral>`, on its own thread and runtime so both
//! sync (CLI) and async tests can use it.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shelf::shelf_core::facets::FacetMap;
use shelf::shelf_core::gateway::product_matches;
use shelf::shelf_core::models::Product;

/// How the stub answers the filter endpoint.
#[derive(Clone, Debug)]
pub enum FilterMode {
    /// Filter the product list like the real service.
    Filter,
    /// Answer with this status and text body.
    Status(u16, String),
    /// Answer 200 with this raw body.
    Raw(String),
}

pub struct Stub {
    pub base_url: String,
    pub state: Arc<StubState>,
}

pub struct StubState {
    products: Vec<Product>,
    mode: Mutex<FilterMode>,
    pub filter_bodies: Mutex<Vec<Value>>,
    pub list_calls: AtomicUsize,
}

impl Stub {
    pub fn set_mode(&self, mode: FilterMode) {
        *self.state.mode.lock().unwrap() = mode;
    }

    pub fn filter_bodies(&self) -> Vec<Value> {
        self.state.filter_bodies.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }
}

pub fn scenario_products() -> Vec<Product> {
    vec![
        Product::new(1, "Samba OG", "아디다스", 90000).with_likes(5),
        Product::new(2, "Air Force 1", "나이키", 130000).with_likes(20),
        Product::new(3, "Air Max 90", "나이키", 179000).with_likes(5),
        Product::new(4, "Gel-Kayano 14", "아식스", 209000).with_likes(11),
        Product::new(5, "Speedcross 6", "살로몬", 450000).with_likes(2),
    ]
}

async fn list_products(State(state): State<Arc<StubState>>) -> Json<Vec<Product>> {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.products.clone())
}

async fn filter_products(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.filter_bodies.lock().unwrap().push(body.clone());
    let mode = state.mode.lock().unwrap().clone();
    match mode {
        FilterMode::Filter => {
            let facets: FacetMap = match serde_json::from_value(body) {
                Ok(f) => f,
                Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            };
            let matched: Vec<Product> = state
                .products
                .iter()
                .filter(|p| product_matches(p, &facets))
                .cloned()
                .collect();
            Json(matched).into_response()
        }
        FilterMode::Status(code, text) => {
            let status = StatusCode::from_u16(code).unwrap();
            (status, text).into_response()
        }
        FilterMode::Raw(raw) => {
            ([("content-type", "application/json")], raw).into_response()
        }
    }
}

/// Start the stub and return once it is accepting connections.
pub fn start_stub(products: Vec<Product>, mode: FilterMode) -> Stub {
    let state = Arc::new(StubState {
        products,
        mode: Mutex::new(mode),
        filter_bodies: Mutex::new(Vec::new()),
        list_calls: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/products", get(list_products))
        .route("/products/filter", post(filter_products))
        .with_state(state.clone());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    Stub {
        base_url: format!("http://{}", addr),
        state,
    }
}
