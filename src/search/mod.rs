// src/search/mod.rs
//! Similar-content search against an Elasticsearch-compatible index.

pub mod query;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::article::Article;
use crate::config::ElasticConfig;
use crate::error::{Dependency, ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Result envelope returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub status: Status,
    pub total: u64,
    pub took: u64,
    pub results: Vec<Article>,
}

#[async_trait]
pub trait SimilarSearch: Send + Sync {
    async fn find_similar(&self, article: &Article) -> ServiceResult<SearchResponse>;
}

pub struct ElasticSearch {
    search_url: String,
    user: String,
    password: String,
    client: Client,
}

impl ElasticSearch {
    pub fn new(cfg: &ElasticConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("video-recoman/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .build()
            .map_err(|e| ServiceError::connectivity(Dependency::SearchIndex, e))?;
        Ok(Self::with_client(cfg, client))
    }

    pub fn with_client(cfg: &ElasticConfig, client: Client) -> Self {
        Self {
            search_url: format!("{}/{}/_search", cfg.cluster.trim_end_matches('/'), cfg.index),
            user: cfg.user.clone(),
            password: cfg.password.clone(),
            client,
        }
    }
}

#[async_trait]
impl SimilarSearch for ElasticSearch {
    async fn find_similar(&self, article: &Article) -> ServiceResult<SearchResponse> {
        let q = query::build(article)?;
        tracing::debug!(id = %article.id, candidates = ?q.candidate_terms, "collected keywords");

        let resp = self
            .client
            .post(&self.search_url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&q.body)
            .send()
            .await
            .map_err(|e| ServiceError::connectivity(Dependency::SearchIndex, e))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::connectivity(Dependency::SearchIndex, e))?;

        if !status.is_success() {
            return Err(ServiceError::QueryExecution {
                status: status.as_u16(),
                reason: error_reason(&body),
            });
        }

        let raw: RawSearchResult =
            serde_json::from_slice(&body).map_err(|source| ServiceError::Decode {
                dependency: Dependency::SearchIndex,
                source,
            })?;
        let response = into_response(raw);
        tracing::info!(
            id = %article.id,
            total = response.total,
            decoded = response.results.len(),
            took = response.took,
            "search finished"
        );
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchResult {
    #[serde(default)]
    took: u64,
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

/// Total counts every returned hit (capped at one page); hits whose source does
/// not decode are dropped.
fn into_response(raw: RawSearchResult) -> SearchResponse {
    let mut hits = raw.hits.hits;
    hits.truncate(query::PAGE_SIZE);
    let total = hits.len() as u64;
    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(source) = hit.source else {
            tracing::debug!(hit = %hit.id, "hit without _source skipped");
            continue;
        };
        match serde_json::from_value::<Article>(source) {
            Ok(a) => {
                if a.keywords.is_empty() {
                    tracing::debug!(id = %a.id, "hit has no keywords");
                }
                results.push(a);
            }
            Err(e) => tracing::debug!(hit = %hit.id, error = %e, "undecodable hit skipped"),
        }
    }
    SearchResponse {
        status: Status::Ok,
        total,
        took: raw.took,
        results,
    }
}

/// Pull `error.type: error.reason` out of an engine error body, falling back to raw text.
fn error_reason(body: &[u8]) -> String {
    if let Ok(v) = serde_json::from_slice::<Value>(body) {
        let err = &v["error"];
        if let (Some(kind), Some(reason)) = (err["type"].as_str(), err["reason"].as_str()) {
            return format!("{kind}: {reason}");
        }
        if let Some(s) = err.as_str() {
            return s.to_string();
        }
    }
    String::from_utf8_lossy(body).chars().take(200).collect()
}
