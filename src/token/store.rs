use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Error;
use crate::types::SessionToken;

/// Durable mapping from token id to session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Inserts the token, overwriting any record with the same id.
    async fn store(&self, token: &SessionToken) -> Result<(), Error>;

    /// `Ok(None)` means no record exists for `token_id`.
    async fn get(&self, token_id: &str) -> Result<Option<SessionToken>, Error>;

    /// Fails with [`Error::NotDeleted`] if no record exists for `token_id`.
    async fn delete(&self, token_id: &str) -> Result<(), Error>;

    /// Removes every token expiring at or before `now`, returning how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, Error>;
}
