mod datasets;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use memberday_core::{AppConfig, Dataset, MemberDays};
use memberday_scraper::PageClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::cache::TtlCache;
use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Upstream page for each dataset.
#[derive(Debug, Clone)]
pub struct SourceUrls {
    pub holiday: String,
    pub party_world: String,
}

impl SourceUrls {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            holiday: config.holiday_url.clone(),
            party_world: config.party_world_url.clone(),
        }
    }

    fn url(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Holiday => &self.holiday,
            Dataset::PartyWorld => &self.party_world,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TtlCache<MemberDays>>,
    pub client: PageClient,
    pub sources: Arc<SourceUrls>,
}

/// Error body in the `{"detail": ...}` shape clients already consume.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct LivenessData {
    message: &'static str,
}

async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessData {
            message: "Hello World",
        }),
    )
}

/// CORS for the configured origins, or any origin when none are configured.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(error) => {
                    tracing::warn!(origin = %origin, error = %error, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api", post(liveness))
        .route("/api/", post(liveness))
        .route("/api/holiday_data", get(datasets::holiday_data))
        .route("/api/party_world_data", get(datasets::party_world_data))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}
