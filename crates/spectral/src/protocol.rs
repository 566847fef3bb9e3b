use serde::{Deserialize, Serialize};

use crate::image::RasterImage;

/// Correlates a response with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host -> worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRequest {
    Compute { image: RasterImage, id: RequestId },
    /// Drops a queued request that has not started yet.
    Cancel { id: RequestId },
}

/// Worker -> host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerResponse {
    Result { result: RasterImage, id: RequestId },
    Error { error: String, id: RequestId },
}

impl WorkerResponse {
    pub fn id(&self) -> &RequestId {
        match self {
            WorkerResponse::Result { id, .. } | WorkerResponse::Error { id, .. } => id,
        }
    }
}
