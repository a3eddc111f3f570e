use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::error::Error;
use crate::token::store::TokenStore;
use crate::types::SessionToken;

/// In-process token store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, SessionToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(&self, token: &SessionToken) -> Result<(), Error> {
        self.tokens
            .write()
            .await
            .insert(token.token_id.clone(), token.clone());

        Ok(())
    }

    async fn get(&self, token_id: &str) -> Result<Option<SessionToken>, Error> {
        Ok(self.tokens.read().await.get(token_id).cloned())
    }

    async fn delete(&self, token_id: &str) -> Result<(), Error> {
        match self.tokens.write().await.remove(token_id) {
            Some(_) => Ok(()),
            None => Err(Error::NotDeleted),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();

        tokens.retain(|_, token| token.expiration_time > now);

        Ok((before - tokens.len()) as u64)
    }
}
