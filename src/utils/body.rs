use async_trait::async_trait;
use axum::body::Body;

use crate::core::config::BodyLimits;
use crate::core::error::Error;
use crate::types::Credentials;

/// Reads and parses the login credentials carried by a request.
#[async_trait]
pub trait BodyReader: Send {
    async fn read_credentials(self) -> Result<Credentials, Error>;
}

/// Reads a JSON body from an axum request, bounded in size and time.
pub struct AxumBodyReader {
    body: Body,
    limits: BodyLimits,
}

impl AxumBodyReader {
    pub fn new(body: Body, limits: BodyLimits) -> Self {
        Self { body, limits }
    }
}

#[async_trait]
impl BodyReader for AxumBodyReader {
    async fn read_credentials(self) -> Result<Credentials, Error> {
        let bytes = tokio::time::timeout(
            self.limits.timeout,
            axum::body::to_bytes(self.body, self.limits.max_bytes),
        )
        .await
        .map_err(|_| Error::BodyTimeout)?
        .map_err(|e| Error::Body(e.to_string()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}
