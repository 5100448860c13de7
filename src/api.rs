// src/api.rs
//! HTTP surface: `/similar/{id}` (plus the legacy `/mlt/{id}`), `/info`, `/metrics`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use tower_http::trace::TraceLayer;

use crate::contentapi::ContentLookup;
use crate::error::{Dependency, ServiceError, ServiceResult};
use crate::metrics::{self, Metrics};
use crate::search::{SimilarSearch, Status};

static CONTENT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("content id regex"));

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentLookup>,
    pub search: Arc<dyn SimilarSearch>,
    /// Deadline budget for one request, covering lookup and search.
    pub timeout: Duration,
}

impl AppState {
    pub fn new(
        content: Arc<dyn ContentLookup>,
        search: Arc<dyn SimilarSearch>,
        timeout: Duration,
    ) -> Self {
        Self {
            content,
            search,
            timeout,
        }
    }
}

pub fn router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let app = Router::new()
        .route("/similar/{id}", get(similar))
        .route("/mlt/{id}", get(similar))
        .route("/info", get(info))
        .with_state(state);

    let app = match metrics {
        Some(m) => app.merge(m.router()),
        None => app,
    };
    app.layer(TraceLayer::new_for_http())
}

async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Body sent with every failed `/similar` call.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: Status,
    total: u64,
    took: u64,
}

fn error_response(code: StatusCode) -> Response {
    let body = ErrorBody {
        status: Status::Error,
        total: 0,
        took: 0,
    };
    (code, Json(body)).into_response()
}

async fn similar(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if !CONTENT_ID.is_match(&id) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let started = std::time::Instant::now();
    let deadline = Instant::now() + state.timeout;
    let elapsed_ms = || started.elapsed().as_secs_f64() * 1000.0;

    let lookup = within(deadline, Dependency::ContentApi, state.content.get_article(&id));
    let article = match lookup.await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%id, error = %e, kind = e.kind(), "content lookup failed");
            metrics::record_upstream_error(&e);
            metrics::record_request("lookup_error", elapsed_ms());
            return error_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let query = within(deadline, Dependency::SearchIndex, state.search.find_similar(&article));
    match query.await {
        Ok(resp) => {
            metrics::record_hits(resp.total);
            metrics::record_request("ok", elapsed_ms());
            (StatusCode::OK, Json(resp)).into_response()
        }
        Err(e) => {
            tracing::error!(%id, error = %e, kind = e.kind(), "similar search failed");
            metrics::record_upstream_error(&e);
            metrics::record_request("search_error", elapsed_ms());
            error_response(StatusCode::BAD_GATEWAY)
        }
    }
}

/// Run `fut` until `deadline`; overrunning counts as a connectivity failure.
async fn within<T, F>(deadline: Instant, dependency: Dependency, fut: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    match timeout_at(deadline, fut).await {
        Ok(res) => res,
        Err(_) => Err(ServiceError::connectivity(dependency, "deadline exceeded")),
    }
}
