//! HTTP surface: `GET /api/random-media` and `GET /health`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use mediapick_pipeline::candidate_pipeline::CandidatePipeline;
use mediapick_pipeline::pipelines::random_media::RandomMediaPipeline;
use mediapick_pipeline::{
    Category, MediaError, MediaHit, MediaQuery, MediaType, Orientation, Randomness,
};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<RandomMediaPipeline>,
    requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(pipeline: RandomMediaPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_request_id(&self) -> String {
        format!("req-{}", self.requests.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/random-media", get(random_media))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Provider-side failures collapse into one retryable message; the
    /// detail goes to the log only.
    fn from_media(request_id: &str, err: MediaError) -> Self {
        match err {
            MediaError::MissingApiKey => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured")
            }
            other => {
                error!("request_id={} fetch failed: {}", request_id, other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch media")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Raw query string. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct RandomMediaParams {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub orientation: Option<String>,
    pub randomness: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RandomMediaParams {
    pub fn into_query(self, request_id: String) -> ApiResult<MediaQuery> {
        let media_type = present(&self.media_type)
            .map(str::parse::<MediaType>)
            .transpose()
            .map_err(ApiError::bad_request)?
            .unwrap_or_default();
        let category = present(&self.category)
            .map(str::parse::<Category>)
            .transpose()
            .map_err(ApiError::bad_request)?;
        let orientation = present(&self.orientation)
            .map(str::parse::<Orientation>)
            .transpose()
            .map_err(ApiError::bad_request)?
            .unwrap_or_default();
        let randomness = present(&self.randomness)
            .map(|r| {
                r.parse::<i64>()
                    .map(Randomness::new)
                    .map_err(|_| ApiError::bad_request(format!("randomness must be an integer, got '{}'", r)))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(MediaQuery {
            request_id,
            media_type,
            query: present(&self.q).map(str::to_string),
            category,
            orientation,
            randomness,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RandomMediaResponse {
    pub media: MediaHit,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
}

async fn random_media(
    State(state): State<AppState>,
    Query(params): Query<RandomMediaParams>,
) -> ApiResult<Json<RandomMediaResponse>> {
    let request_id = state.next_request_id();
    let query = params.into_query(request_id.clone())?;

    let mut rng = StdRng::from_entropy();
    let result = state
        .pipeline
        .execute(query, &mut rng)
        .await
        .map_err(|err| ApiError::from_media(&request_id, err))?;

    if result.retrieved_count == 0 {
        return Err(ApiError::not_found("No media found"));
    }
    let selected = result
        .selected
        .ok_or_else(|| ApiError::not_found("No suitable media found"))?;

    Ok(Json(RandomMediaResponse {
        media: selected.hit,
        media_type: result.query.media_type,
        total_hits: result.total_hits,
    }))
}

async fn health() -> &'static str {
    "ok"
}
