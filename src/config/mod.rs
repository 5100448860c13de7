// src/config/mod.rs
pub mod service;

pub use service::{ContentApiConfig, ElasticConfig, ServiceConfig, ENV_CONFIG_PATH};
