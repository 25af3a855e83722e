// ABOUTME: Handler flattening posted scrape records into CSV text.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use digests_harvest::{flatten_values, to_csv};

use crate::error::ApiResult;
use crate::requests::ExportRequest;

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub csv_data: String,
}

/// `POST /api/export-csv`
pub async fn export_csv_handler(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> ApiResult<Json<ExportResponse>> {
    let Json(request) = payload?;
    let records = request.validate()?;

    let rows = flatten_values(&records)?;
    tracing::debug!(records = records.len(), rows = rows.len(), "export csv");
    Ok(Json(ExportResponse {
        csv_data: to_csv(&rows),
    }))
}
