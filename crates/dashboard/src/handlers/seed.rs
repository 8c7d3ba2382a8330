//! Database seeding handler.

use std::sync::Arc;

use axum::{Extension, response::Json};
use seed_data::db::{Seeder, Store};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info_span};
use utoipa::ToSchema;

use crate::{
    errors::{AppError, ErrorResponse},
    request_id::RequestId,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedResponse {
    pub message: String,
}

/// Create the dashboard tables if missing and insert the sample data.
///
/// Everything runs in one transaction; rows already present are skipped.
#[utoipa::path(
    get,
    path = "/seed",
    tag = "seed",
    responses(
        (status = 200, description = "Database seeded", body = SeedResponse),
        (status = 500, description = "Seeding failed and was rolled back", body = ErrorResponse)
    )
)]
pub async fn seed_database(
    Extension(store): Extension<Arc<dyn Store>>,
    Extension(seeder): Extension<Arc<Seeder>>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<SeedResponse>, AppError> {
    let span = info_span!("seed", request_id = %request_id.as_str());
    let report = seeder
        .seed(store.as_ref())
        .instrument(span)
        .await
        .inspect_err(|e| error!(request_id = %request_id.as_str(), "Seed rolled back: {e}"))?;
    Ok(Json(SeedResponse {
        message: report.message,
    }))
}
