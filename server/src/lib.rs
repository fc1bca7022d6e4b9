use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog::persist::load_catalog;
use catalog::validate::{CoursePatch, NewCourse};
use catalog::{Catalog, CatalogError, Course, CourseId, Page, PageRequest, SharedCatalog};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const DEFAULT_PAGE_NUMBER: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "page-number")]
    pub page_number: Option<String>,
    #[serde(rename = "page-size")]
    pub page_size: Option<String>,
    /// Comma separated.
    #[serde(rename = "title-words")]
    pub title_words: Option<String>,
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub requests: u64,
    pub uptime_s: f64,
    pub requests_per_second: f64,
    pub course_count: usize,
    pub keyword_count: usize,
}

/// Request counter behind `/stats`.
pub struct RequestStats {
    started: Instant,
    requests: AtomicU64,
}

impl RequestStats {
    fn new() -> Self { Self { started: Instant::now(), requests: AtomicU64::new(0) } }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    pub stats: Arc<RequestStats>,
}

/// Error body `{"message": ...}` with the matching status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::new(StatusCode::NOT_FOUND, format!("Course {id} does not exist")),
            CatalogError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Missing or bad data"),
            CatalogError::BadRequest(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Load the dataset at `data_path` and build the router around it.
pub fn build_app<P: AsRef<FsPath>>(data_path: P) -> Result<Router> {
    let catalog = load_catalog(data_path)?;
    Ok(build_router(catalog))
}

pub fn build_router(catalog: Catalog) -> Router {
    let state = AppState { catalog: catalog.into_shared(), stats: Arc::new(RequestStats::new()) };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/course", get(list_courses).post(create_course))
        .route("/course/:id", get(get_course).put(update_course).delete(delete_course))
        .layer(middleware::from_fn_with_state(state.stats.clone(), count_requests))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

// CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
fn cors_layer() -> CorsLayer {
    let any = || CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                any()
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => any(),
    }
}

async fn count_requests(State(stats): State<Arc<RequestStats>>, req: Request, next: Next) -> Response {
    stats.requests.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

fn parse_page_param(raw: Option<&str>, default: i64) -> ApiResult<i64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| ApiError::from(CatalogError::BadRequest("Invalid pagination parameters".into()))),
    }
}

/// Non-numeric and negative ids get the same 404 body as a missing course.
fn course_id(raw: &str) -> ApiResult<CourseId> {
    raw.parse::<CourseId>()
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, format!("Course {raw} does not exist")))
}

pub async fn get_course(State(state): State<AppState>, Path(raw): Path<String>) -> ApiResult<Json<Course>> {
    let id = course_id(&raw)?;
    let course = state.catalog.read().get(id)?.clone();
    Ok(Json(course))
}

pub async fn list_courses(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Json<Page<Course>>> {
    let number = parse_page_param(params.page_number.as_deref(), DEFAULT_PAGE_NUMBER)?;
    let size = parse_page_param(params.page_size.as_deref(), DEFAULT_PAGE_SIZE)?;
    let page_req = PageRequest::new(number, size)?;
    let words: Vec<&str> = params
        .title_words
        .as_deref()
        .map(|w| w.split(',').collect())
        .unwrap_or_default();

    let page = state.catalog.read().list(&words, page_req).cloned();
    tracing::debug!(words = ?words, page_number = number, page_size = size, hits = page.metadata.record_count, "list courses");
    if page.is_empty() {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "No matching course found"));
    }
    Ok(Json(page))
}

pub async fn create_course(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Course>>)> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!(error = %e, "rejected create payload");
        ApiError::new(StatusCode::BAD_REQUEST, "Missing or bad data")
    })?;
    let new = NewCourse::from_json(&body).map_err(|e| {
        tracing::debug!(error = %e, "invalid create payload");
        ApiError::from(e)
    })?;
    let course = state.catalog.write().create(new)?;
    tracing::info!(id = course.id, "course created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Course>>> {
    let id = course_id(&raw)?;
    let bad_format = |detail: String| {
        tracing::debug!(id, error = %detail, "invalid update payload");
        ApiError::new(StatusCode::BAD_REQUEST, "Bad or invalid request format")
    };
    let Json(body) = payload.map_err(|e| bad_format(e.to_string()))?;
    let patch = CoursePatch::from_json(&body).map_err(|e| bad_format(e.to_string()))?;
    let course = state.catalog.write().update(id, patch)?;
    tracing::info!(id, "course updated");
    Ok(Json(DataResponse { data: course }))
}

pub async fn delete_course(State(state): State<AppState>, Path(raw): Path<String>) -> ApiResult<Json<Value>> {
    let id = course_id(&raw)?;
    state.catalog.write().delete(id)?;
    tracing::info!(id, "course deleted");
    Ok(Json(json!({ "message": "The specified course was deleted" })))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let requests = state.stats.requests.load(Ordering::Relaxed);
    let uptime_s = state.stats.started.elapsed().as_secs_f64();
    let (course_count, keyword_count) = {
        let catalog = state.catalog.read();
        (catalog.len(), catalog.keyword_count())
    };
    Json(StatsResponse {
        requests,
        uptime_s,
        requests_per_second: if uptime_s > 0.0 { requests as f64 / uptime_s } else { 0.0 },
        course_count,
        keyword_count,
    })
}
