//! Common Test Utilities for Integration Tests
//!
//! An in-memory owners backend served by axum on a random local port.
//! Ids are assigned sequentially from 1, missing owners return 404 and the
//! list endpoint returns a JSON array.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use owners_loadgen::OwnerPayload;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Owner {
    pub id: u32,
    #[serde(flatten)]
    pub payload: OwnerPayload,
}

#[derive(Debug, Default)]
struct BackendInner {
    owners: Vec<Owner>,
    /// Every request seen, as `<METHOD> <path>`
    requests: Vec<String>,
}

/// Shared state of the mock backend
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<BackendInner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds owner 1
    pub fn with_first_owner() -> Self {
        let backend = Self::new();
        backend.insert(OwnerPayload {
            first_name: "George".to_string(),
            last_name: "Franklin".to_string(),
            address: "110 W. Liberty St.".to_string(),
            city: "Madison".to_string(),
            telephone: "6085551023".to_string(),
        });
        backend
    }

    pub fn insert(&self, payload: OwnerPayload) -> Owner {
        let mut inner = self.inner.lock().unwrap();
        let owner = Owner {
            id: inner.owners.len() as u32 + 1,
            payload,
        };
        inner.owners.push(owner.clone());
        owner
    }

    pub fn owners(&self) -> Vec<Owner> {
        self.inner.lock().unwrap().owners.clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    fn log(&self, request: String) {
        self.inner.lock().unwrap().requests.push(request);
    }
}

async fn list_owners(State(backend): State<MockBackend>) -> Json<Vec<Owner>> {
    backend.log("GET /owners".to_string());
    Json(backend.owners())
}

async fn create_owner(
    State(backend): State<MockBackend>,
    Json(payload): Json<OwnerPayload>,
) -> Json<Owner> {
    backend.log("POST /owners".to_string());
    Json(backend.insert(payload))
}

async fn find_owner(
    State(backend): State<MockBackend>,
    Path(owner_id): Path<u32>,
) -> Result<Json<Owner>, StatusCode> {
    backend.log(format!("GET /owners/{}", owner_id));
    backend
        .owners()
        .into_iter()
        .find(|o| o.id == owner_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Create the mock owners router
pub fn create_owners_app(backend: MockBackend) -> Router {
    Router::new()
        .route("/owners", get(list_owners).post(create_owner))
        .route("/owners/:owner_id", get(find_owner))
        .with_state(backend)
}

/// Start the mock backend on a random port
pub async fn start_mock_backend(backend: MockBackend) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = create_owners_app(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (addr, handle)
}

/// Initialize test logging for detailed output
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "owners_loadgen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
