// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod article;
pub mod config;
pub mod contentapi;
pub mod error;
pub mod metrics;
pub mod search;

use std::sync::Arc;

use anyhow::Context;

pub use crate::api::{router, AppState};
pub use crate::article::{Article, Keyword, Tag};
pub use crate::config::ServiceConfig;
pub use crate::error::{ServiceError, ServiceResult};
pub use crate::search::{SearchResponse, Status};

use crate::contentapi::HttpContentApi;
use crate::metrics::Metrics;
use crate::search::ElasticSearch;

/// Wire the real content API and search clients from `cfg` into the full router.
pub fn app(cfg: &ServiceConfig) -> anyhow::Result<axum::Router> {
    let content = HttpContentApi::new(&cfg.api).context("building content API client")?;
    let search = ElasticSearch::new(&cfg.elastic).context("building search client")?;
    let metrics = Metrics::init().context("installing prometheus recorder")?;

    let state = AppState::new(Arc::new(content), Arc::new(search), cfg.timeout());
    Ok(router(state, Some(&metrics)))
}
