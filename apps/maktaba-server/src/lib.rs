//! Maktaba Server Library
//!
//! EPUB reading backend for the Maktaba book platform: chapter extraction,
//! sanitization, table of contents and in-book search over HTTP.
//!
//! # Modules
//!
//! - `epub`: EPUB reader core (archive, package, chapters, search)
//! - `library`: Book catalog mapping ids to EPUB files
//! - `service`: Reader operations on top of the catalog and core
//! - `routes`: HTTP endpoints

pub mod config;
pub mod epub;
pub mod error;
pub mod library;
pub mod routes;
pub mod service;
pub mod state;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/health", get(routes::health::health_check))
        .nest("/api/v1/epub", routes::epub::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
