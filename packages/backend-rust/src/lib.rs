pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use axum::http::HeaderValue;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;

pub fn create_app(state: AppState, config: &Config) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

/// Development accepts any origin; production only the configured frontend.
fn cors_layer(config: &Config) -> CorsLayer {
    if !config.is_production() {
        return CorsLayer::permissive();
    }

    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        Err(err) => {
            tracing::warn!(error = %err, url = %config.frontend_url, "invalid FRONTEND_URL, CORS disabled");
            CorsLayer::new()
        }
    }
}
