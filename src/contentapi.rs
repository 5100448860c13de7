// src/contentapi.rs
//! Content lookup against the content API (`GET {host}{id}` with basic auth).

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::article::{Article, ContentEnvelope};
use crate::config::ContentApiConfig;
use crate::error::{Dependency, ServiceError, ServiceResult};

#[async_trait]
pub trait ContentLookup: Send + Sync {
    /// Fetch a single article by its content id.
    async fn get_article(&self, id: &str) -> ServiceResult<Article>;
}

pub struct HttpContentApi {
    host: String,
    user: String,
    pass: String,
    client: Client,
}

impl HttpContentApi {
    pub fn new(cfg: &ContentApiConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("video-recoman/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .build()
            .map_err(|e| ServiceError::connectivity(Dependency::ContentApi, e))?;
        Ok(Self::with_client(cfg, client))
    }

    pub fn with_client(cfg: &ContentApiConfig, client: Client) -> Self {
        Self {
            host: cfg.host.clone(),
            user: cfg.user.clone(),
            pass: cfg.pass.clone(),
            client,
        }
    }

    fn url_for(&self, id: &str) -> String {
        format!("{}{}", self.host, id)
    }
}

#[async_trait]
impl ContentLookup for HttpContentApi {
    async fn get_article(&self, id: &str) -> ServiceResult<Article> {
        let url = self.url_for(id);
        tracing::debug!(%url, "requesting content");

        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await
            .map_err(|e| ServiceError::connectivity(Dependency::ContentApi, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Remote {
                dependency: Dependency::ContentApi,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::connectivity(Dependency::ContentApi, e))?;
        let envelope: ContentEnvelope =
            serde_json::from_slice(&body).map_err(|source| ServiceError::Decode {
                dependency: Dependency::ContentApi,
                source,
            })?;

        let article = envelope.content;
        tracing::info!(
            %id,
            web_url = %article.web_url,
            headline = article.field("headline").unwrap_or_default(),
            "got content"
        );
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_appended_to_host_verbatim() {
        let api = HttpContentApi::with_client(
            &ContentApiConfig {
                host: "http://frank.local/content/".into(),
                user: "u".into(),
                pass: "p".into(),
            },
            Client::new(),
        );
        assert_eq!(api.url_for("181291926"), "http://frank.local/content/181291926");
    }
}
