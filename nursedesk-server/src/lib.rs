//! REST API over a [`NurseStore`].
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/nurses` | 200, all records newest first |
//! | GET | `/api/nurses/:id` | 200, one record |
//! | POST | `/api/nurses` | 201, created record |
//! | PUT | `/api/nurses/:id` | 200, updated record |
//! | DELETE | `/api/nurses/:id` | 200 |
//! | GET | `/api/health` | 200, status and record count |
//!
//! Failures carry `{"error": <message>, "kind": <taxonomy>}`; see [`ApiError`].

pub mod error;
pub mod handlers;
pub mod settings;

pub use error::ApiError;
pub use settings::ServerSettings;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use nursedesk_core::NurseStore;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Shared handler state.
///
/// The store sits behind a single `Mutex`: each handler holds the lock for
/// exactly one store call, which serialises writes. Two updates racing on the
/// same id are last-write-wins. Store calls run on tokio's blocking pool, off
/// the async worker threads.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<NurseStore>>,
}

impl AppState {
    pub fn new(store: NurseStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `op` against the locked store on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut NurseStore) -> nursedesk_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store
                .lock()
                .map_err(|_| ApiError::Internal("Store lock poisoned".to_string()))?;
            op(&mut guard).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {e}")))?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/nurses",
            get(handlers::list_nurses).post(handlers::create_nurse),
        )
        .route(
            "/api/nurses/:id",
            get(handlers::get_nurse)
                .put(handlers::update_nurse)
                .delete(handlers::delete_nurse),
        )
        .route("/api/health", get(handlers::health))
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    log::info!("nursedesk API listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("REST API server failed")?;

    log::info!("nursedesk API stopped");
    Ok(())
}

/// Opens the configured database, binds the configured address and serves
/// until Ctrl-C.
pub async fn run(settings: &ServerSettings) -> anyhow::Result<()> {
    let db_path = settings.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let store = NurseStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let listener = TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind to address: {}", settings.bind_address))?;

    serve(listener, AppState::new(store), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for shutdown signal: {e}");
        }
    })
    .await
}
