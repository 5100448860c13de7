// src/error.rs
use std::fmt;
use thiserror::Error;

/// Which outbound collaborator an error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    ContentApi,
    SearchIndex,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::ContentApi => "content_api",
            Dependency::SearchIndex => "search_index",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network, DNS, TLS or deadline failure.
    #[error("{dependency} unreachable: {message}")]
    Connectivity {
        dependency: Dependency,
        message: String,
    },

    /// The collaborator answered with a non-2xx status.
    #[error("{dependency} responded with HTTP {status}")]
    Remote { dependency: Dependency, status: u16 },

    #[error("malformed {dependency} response: {source}")]
    Decode {
        dependency: Dependency,
        #[source]
        source: serde_json::Error,
    },

    #[error("no keyword scored above {threshold}")]
    Precondition { threshold: f64 },

    #[error("search query rejected (HTTP {status}): {reason}")]
    QueryExecution { status: u16, reason: String },
}

impl ServiceError {
    pub(crate) fn connectivity(dependency: Dependency, err: impl fmt::Display) -> Self {
        ServiceError::Connectivity {
            dependency,
            message: err.to_string(),
        }
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Connectivity { .. } => "connectivity",
            ServiceError::Remote { .. } => "remote",
            ServiceError::Decode { .. } => "decode",
            ServiceError::Precondition { .. } => "precondition",
            ServiceError::QueryExecution { .. } => "query_execution",
        }
    }

    pub fn dependency(&self) -> Option<Dependency> {
        match self {
            ServiceError::Connectivity { dependency, .. }
            | ServiceError::Remote { dependency, .. }
            | ServiceError::Decode { dependency, .. } => Some(*dependency),
            ServiceError::QueryExecution { .. } => Some(Dependency::SearchIndex),
            ServiceError::Precondition { .. } => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
