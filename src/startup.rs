use crate::config::{Settings, StorageBackend};
use crate::error::AppError;
use crate::handlers;
use crate::middleware::metrics::metrics_middleware;
use crate::services::{BarcodeLookupClient, MemoryStore, MongoDb, Store};
use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. All backend handles are constructed once at
/// startup and injected here; no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub lookup: Arc<BarcodeLookupClient>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let store: Arc<dyn Store> = match settings.storage.backend {
            StorageBackend::Mongo => {
                let db =
                    MongoDb::connect(&settings.storage.mongodb.uri, &settings.storage.mongodb.database)
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to connect to MongoDB: {}", e);
                            e
                        })?;
                db.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;
                Arc::new(db)
            }
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage backend");
                Arc::new(MemoryStore::new())
            }
        };

        let lookup = Arc::new(BarcodeLookupClient::new(settings.lookup.clone()));

        let state = AppState { store, lookup };

        let app = build_router(state);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .route("/lookup", get(handlers::lookup::lookup_barcode))
        .route(
            "/products",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/products/:id",
            patch(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/inventory/overview",
            get(handlers::products::inventory_overview),
        )
        .route(
            "/invoices",
            post(handlers::invoices::create_invoice).get(handlers::invoices::list_invoices),
        )
        .route("/invoices/export", post(handlers::export::export_invoice))
        .route("/invoices/:id", get(handlers::invoices::get_invoice))
        .route(
            "/invoices/:id/reconcile",
            post(handlers::invoices::reconcile_invoice),
        )
        .route(
            "/profile",
            get(handlers::profile::get_profile).put(handlers::profile::upsert_profile),
        )
        .layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
