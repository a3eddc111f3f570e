use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::core::error::Error;
use crate::token::store::TokenStore;
use crate::types::SessionToken;

#[derive(Clone, Debug)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    #[tracing::instrument(skip_all)]
    async fn store(&self, token: &SessionToken) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO session_tokens (token_id, user_name, valid, expiration_time, access_rights)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (token_id) DO UPDATE SET
                user_name = EXCLUDED.user_name,
                valid = EXCLUDED.valid,
                expiration_time = EXCLUDED.expiration_time,
                access_rights = EXCLUDED.access_rights;",
        )
        .bind(&token.token_id)
        .bind(&token.user_name)
        .bind(token.valid)
        .bind(token.expiration_time)
        .bind(&token.access_rights)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn get(&self, token_id: &str) -> Result<Option<SessionToken>, Error> {
        let token = sqlx::query(
            "SELECT
                token_id,
                user_name,
                valid,
                expiration_time,
                access_rights
            FROM session_tokens
            WHERE token_id = $1;",
        )
        .bind(token_id)
        .map(map_session_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    #[tracing::instrument(skip_all)]
    async fn delete(&self, token_id: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE token_id = $1;")
            .bind(token_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotDeleted);
        }

        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE expiration_time <= $1;")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn map_session_token(row: PgRow) -> SessionToken {
    SessionToken {
        token_id: row.get("token_id"),
        user_name: row.get("user_name"),
        valid: row.get("valid"),
        expiration_time: row.get("expiration_time"),
        access_rights: row.get("access_rights"),
    }
}
