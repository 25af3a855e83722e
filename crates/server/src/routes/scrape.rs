// ABOUTME: Handlers for single-page and batch scraping.
// ABOUTME: Per-URL failures come back inline as {error, url} with status 200.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use digests_harvest::BatchResult;

use crate::error::ApiResult;
use crate::requests::{BatchRequest, ScrapeJob, ScrapeRequest};
use crate::state::AppState;

/// `POST /api/scrape`
pub async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let job = request.validate()?;

    let response = match job {
        ScrapeJob::Basic { url, rules } => {
            tracing::info!(url = %url, "scrape");
            Json(state.client.scrape(&url, rules.as_ref()).await).into_response()
        }
        ScrapeJob::Table {
            url,
            table_selector,
        } => {
            tracing::info!(url = %url, table_selector = %table_selector, "table scrape");
            Json(state.client.scrape_tables(&url, &table_selector).await).into_response()
        }
    };
    Ok(response)
}

/// `POST /api/scrape-multiple`
pub async fn scrape_multiple_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<Json<BatchResult>> {
    let Json(request) = payload?;
    let job = request.validate()?;

    let batch = state
        .client
        .scrape_many(&job.urls, job.rules.as_ref(), job.delay)
        .await;
    Ok(Json(batch))
}
