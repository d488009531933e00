//! HTTP API over an in-memory list of todo items.
//!
//! # Overview
//! Serves `GET/POST /api/listitems` and `GET/PUT/DELETE /api/listitems/{id}`
//! on top of a [`ListItemStore`]. Requests are validated here, mutations are
//! logged through `tracing`, and every failure is mapped to a 400, 404 or an
//! opaque 500.
//!
//! # Design
//! - The store is constructed by the caller and handed to [`app`], so each
//!   router (and each test) owns exactly one store.
//! - Cross-origin access is limited to the single origin in [`Config`].
//! - Handler panics are caught and answered like any other internal error.

pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod store;

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyCors, CorsLayer},
    trace::TraceLayer,
};

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use model::{ItemId, ItemPayload, ListItem};
pub use routes::{SharedStore, BASE_PATH};
pub use store::{ListItemStore, StoreError};

pub fn app(store: SharedStore, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([config.allowed_origin.clone()]))
        .allow_methods(AnyCors)
        .allow_headers(AnyCors);

    Router::new()
        .route(BASE_PATH, get(routes::list_items).post(routes::create_item))
        .route(
            "/api/listitems/{id}",
            get(routes::get_item)
                .put(routes::update_item)
                .delete(routes::delete_item),
        )
        .with_state(store)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve on `listener` with a fresh store until ctrl-c.
pub async fn run(listener: TcpListener, config: Config) -> Result<(), std::io::Error> {
    let store = Arc::new(ListItemStore::new());
    axum::serve(listener, app(store, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
