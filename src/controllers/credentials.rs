use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::error::Error;
use crate::types::UserAccount;

/// Source of user accounts that logins are checked against.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn find_user(&self, username: &str) -> Result<Option<UserAccount>, Error>;
}

#[derive(Clone, Debug)]
pub struct PgCredentialSource {
    pool: PgPool,
}

impl PgCredentialSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialSource for PgCredentialSource {
    #[tracing::instrument(skip_all)]
    async fn find_user(&self, username: &str) -> Result<Option<UserAccount>, Error> {
        match sqlx::query(
            "SELECT
                username,
                password_hash,
                access_rights
            FROM users
            WHERE username = $1;",
        )
        .bind(username)
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }
}

fn map_user(row: PgRow) -> UserAccount {
    UserAccount {
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        access_rights: row.get("access_rights"),
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialSource {
    users: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl MemoryCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, account: UserAccount) {
        self.users
            .write()
            .await
            .insert(account.username.clone(), account);
    }
}

#[async_trait]
impl CredentialSource for MemoryCredentialSource {
    async fn find_user(&self, username: &str) -> Result<Option<UserAccount>, Error> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
