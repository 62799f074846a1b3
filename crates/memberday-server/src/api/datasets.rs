use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use memberday_core::{Dataset, MemberDays};
use memberday_scraper::{HolidayExtractor, PartyWorldExtractor, ScraperError};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) async fn holiday_data(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    serve_dataset(&state, Dataset::Holiday, &req_id).await
}

pub(super) async fn party_world_data(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    serve_dataset(&state, Dataset::PartyWorld, &req_id).await
}

async fn serve_dataset(
    state: &AppState,
    dataset: Dataset,
    req_id: &RequestId,
) -> Result<Response, ApiError> {
    let data = state
        .cache
        .get_or_fetch(dataset.cache_key(), || scrape_dataset(state, dataset))
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %req_id.0,
                dataset = %dataset,
                error = %e,
                "dataset refresh failed"
            );
            ApiError::internal(error_detail(dataset, &e))
        })?;

    Ok(Json(&*data).into_response())
}

async fn scrape_dataset(state: &AppState, dataset: Dataset) -> Result<MemberDays, ScraperError> {
    let url = state.sources.url(dataset);
    match dataset {
        Dataset::Holiday => state
            .client
            .scrape(url, &HolidayExtractor)
            .await
            .map(MemberDays::Areas),
        Dataset::PartyWorld => state
            .client
            .scrape(url, &PartyWorldExtractor)
            .await
            .map(MemberDays::Yearly),
    }
}

/// Client-facing message for a failed refresh. Each dataset keeps the
/// wording its consumers already match on.
pub(super) fn error_detail(dataset: Dataset, error: &ScraperError) -> String {
    match (dataset, error.is_fetch()) {
        (Dataset::Holiday, true) => format!("Error fetching data: {error}"),
        (Dataset::Holiday, false) => error.to_string(),
        (Dataset::PartyWorld, true) => format!("HTTP 請求失敗: {error}"),
        (Dataset::PartyWorld, false) => format!("資料爬取失敗: {error}"),
    }
}
