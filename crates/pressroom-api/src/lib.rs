//! pressroom-api
//!
//! HTTP surface of the pressroom PDF pipeline and the error translation
//! shared by its handlers.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/documents",
            post(routes::documents::create_document)
                .delete(routes::documents::delete_documents),
        )
        .route(
            "/documents/{file_name}",
            get(routes::documents::get_document),
        )
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::audit::audit_log)),
        )
        .with_state(state)
}
