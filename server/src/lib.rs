use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use docsearch_core::engine::{source_for_path, QueryOutcome, SearchEngine};
use docsearch_core::navigate::{Navigation, Viewport};
use docsearch_core::{FirstLink, Instruction, PageId, SearchConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Term whose pages should be listed even when its group is collapsed
    pub expand: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// True when the input normalized to nothing; the client clears its results.
    pub no_query: bool,
    pub clear_visible: bool,
    pub instructions: Vec<Instruction>,
    pub first_link: Option<FirstLink>,
}

#[derive(Deserialize)]
pub struct GoParams {
    pub term: String,
    /// Location the client's viewport currently shows
    #[serde(default)]
    pub current: String,
}

#[derive(Serialize)]
pub struct GoResponse {
    pub action: &'static str,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct PageResponse {
    pub page_id: PageId,
    pub file: String,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

type ApiError = (StatusCode, String);

pub fn build_app(index_path: String, config_path: Option<String>) -> Result<Router> {
    let config = match &config_path {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    // The index itself is loaded on the first request that needs it.
    let engine = SearchEngine::new(source_for_path(&index_path), config);
    tracing::info!(index = %index_path, "search engine configured");
    Ok(router(Arc::new(engine)))
}

pub fn router(engine: Arc<SearchEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/pages/:page_id", get(page_handler))
        .route("/go/:page_id", get(go_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %format!("{err:#}"), "index unavailable");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let outcome = state.engine.search(&params.q, params.expand.as_deref()).map_err(internal)?;
    let (no_query, instructions, first_link) = match outcome {
        QueryOutcome::NoQuery => (true, Vec::new(), None),
        QueryOutcome::Results(r) => (false, r.instructions, r.first_link),
    };
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        no_query,
        clear_visible: !no_query,
        instructions,
        first_link,
    }))
}

pub async fn page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
) -> Result<Json<PageResponse>, ApiError> {
    let index = state.engine.index().map_err(internal)?;
    match index.page(page_id) {
        Some(page) => Ok(Json(PageResponse { page_id, file: page.file.clone(), title: page.title.clone() })),
        None => Err((StatusCode::NOT_FOUND, format!("no page {page_id}"))),
    }
}

pub async fn go_handler(
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
    Query(params): Query<GoParams>,
) -> Result<Json<GoResponse>, ApiError> {
    let mut viewport = Viewport::at(params.current);
    match state.engine.navigate(page_id, &params.term, &mut viewport).map_err(internal)? {
        Navigation::Loaded(location) => Ok(Json(GoResponse { action: "load", location: Some(location) })),
        Navigation::AlreadyShowing => Ok(Json(GoResponse { action: "stay", location: None })),
        Navigation::UnknownPage => Err((StatusCode::NOT_FOUND, format!("no page {page_id}"))),
    }
}
