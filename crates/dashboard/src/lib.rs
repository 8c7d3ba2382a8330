pub mod config;
pub mod errors;
pub mod handlers;
pub mod request_id;

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use seed_data::{
    db::{Seeder, Store},
    models::Dataset,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use utoipa::OpenApi;

use crate::{
    errors::ErrorResponse,
    handlers::{SeedResponse, health_check, openapi_json, seed_database},
    request_id::request_id_middleware,
};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::seed_database, handlers::health_check),
    components(schemas(SeedResponse, ErrorResponse)),
    tags(
        (name = "seed", description = "Sample data for the dashboard database"),
        (name = "stats", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn create_router(store: Arc<dyn Store>, dataset: Dataset) -> Router {
    let seeder = Arc::new(Seeder::new(dataset));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/seed", get(seed_database))
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(store))
        .layer(Extension(seeder))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

pub async fn run_server(store: Arc<dyn Store>, dataset: Dataset, port: u16) -> anyhow::Result<()> {
    let app = create_router(store, dataset);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
