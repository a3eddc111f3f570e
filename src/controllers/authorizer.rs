use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::controllers::credentials::CredentialSource;
use crate::core::error::Error;
use crate::token::TokenStore;
use crate::types::{AccessRight, Credentials, SessionToken, TokenRights, TokenState};

const TOKEN_ID_ATTEMPTS: usize = 3;

/// Mediates every trust decision: logins, token checks and logouts.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns `Ok(None)` when the credentials are rejected.
    async fn generate_token(&self, credentials: &Credentials)
    -> Result<Option<SessionToken>, Error>;

    async fn validate_token(&self, token_id: &str) -> Result<bool, Error>;

    async fn token_rights(&self, token_id: &str) -> Result<TokenRights, Error>;

    async fn authorize(&self, token_id: &str, required: AccessRight) -> Result<bool, Error>;

    async fn revoke_token(&self, token_id: &str) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct SessionAuthorizer {
    token_store: Arc<dyn TokenStore>,
    credentials: Arc<dyn CredentialSource>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthorizer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionAuthorizer {
    pub fn new(
        token_store: Arc<dyn TokenStore>,
        credentials: Arc<dyn CredentialSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            token_store,
            credentials,
            ttl,
        }
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, Error> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
    }

    /// Issued ids are never reused, so a clash with any stored record retries.
    async fn fresh_token_id(&self) -> Result<String, Error> {
        for _ in 0..TOKEN_ID_ATTEMPTS {
            let token_id = Uuid::new_v4().to_string();

            if self.token_store.get(&token_id).await?.is_none() {
                return Ok(token_id);
            }

            tracing::warn!("Token id collision, regenerating");
        }

        Err(Error::TokenIdExhausted)
    }
}

#[async_trait]
impl Authorizer for SessionAuthorizer {
    #[tracing::instrument(skip_all, fields(username = %credentials.username))]
    async fn generate_token(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<SessionToken>, Error> {
        let account = match self.credentials.find_user(&credentials.username).await? {
            Some(account) => account,
            None => {
                tracing::info!("Login rejected: unknown user");
                return Ok(None);
            }
        };

        if !self
            .verify_password(&credentials.password, &account.password_hash)
            .await?
        {
            tracing::info!("Login rejected: wrong password");
            return Ok(None);
        }

        let expiration_time = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or(Error::ExpirationOutOfRange)?;

        let token = SessionToken::new(
            self.fresh_token_id().await?,
            account.username,
            expiration_time,
            account.access_rights,
        );

        self.token_store.store(&token).await?;

        tracing::info!(expiration_time = %token.expiration_time, "Issued session token");

        Ok(Some(token))
    }

    async fn validate_token(&self, token_id: &str) -> Result<bool, Error> {
        Ok(self.token_rights(token_id).await?.is_valid())
    }

    async fn token_rights(&self, token_id: &str) -> Result<TokenRights, Error> {
        let token = match self.token_store.get(token_id).await? {
            Some(token) => token,
            None => return Ok(TokenRights::denied(TokenState::Invalid)),
        };

        Ok(match token.state_at(Utc::now()) {
            TokenState::Valid => TokenRights::granted(token.access_rights),
            state => TokenRights::denied(state),
        })
    }

    async fn authorize(&self, token_id: &str, required: AccessRight) -> Result<bool, Error> {
        Ok(self.token_rights(token_id).await?.permits(required))
    }

    #[tracing::instrument(skip_all)]
    async fn revoke_token(&self, token_id: &str) -> Result<(), Error> {
        self.token_store.delete(token_id).await?;

        tracing::info!("Revoked session token");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::credentials::MemoryCredentialSource;
    use crate::token::MemoryTokenStore;
    use crate::types::UserAccount;
    use chrono::{DateTime, SubsecRound};
    use mockall::mock;

    const TEST_COST: u32 = 4;

    mock! {
        Store {}

        #[async_trait]
        impl TokenStore for Store {
            async fn store(&self, token: &SessionToken) -> Result<(), Error>;
            async fn get(&self, token_id: &str) -> Result<Option<SessionToken>, Error>;
            async fn delete(&self, token_id: &str) -> Result<(), Error>;
            async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, Error>;
        }
    }

    async fn credentials_with_user() -> Arc<MemoryCredentialSource> {
        let source = MemoryCredentialSource::new();
        source
            .insert(
                UserAccount::with_password("someUser", "somePassword", vec![0, 1], TEST_COST)
                    .unwrap(),
            )
            .await;

        Arc::new(source)
    }

    async fn authorizer() -> (SessionAuthorizer, MemoryTokenStore) {
        let store = MemoryTokenStore::new();
        let authorizer = SessionAuthorizer::new(
            Arc::new(store.clone()),
            credentials_with_user().await,
            Duration::hours(1),
        );

        (authorizer, store)
    }

    #[tokio::test]
    async fn generates_and_stores_token_for_valid_credentials() {
        let (authorizer, store) = authorizer().await;
        let before = Utc::now().trunc_subsecs(6);

        let token = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(token.user_name, "someUser");
        assert!(token.valid);
        assert_eq!(token.access_rights, vec![0, 1]);
        assert!(token.expiration_time >= before + Duration::hours(1));
        assert_eq!(token.expiration_time.timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(store.get(&token.token_id).await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn unrepresentable_expiration_is_an_error() {
        let store = MemoryTokenStore::new();
        let authorizer = SessionAuthorizer::new(
            Arc::new(store.clone()),
            credentials_with_user().await,
            Duration::days(i64::from(i32::MAX)),
        );

        let err = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ExpirationOutOfRange));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn issues_distinct_token_ids() {
        let (authorizer, store) = authorizer().await;
        let credentials = Credentials::new("someUser", "somePassword");

        let first = authorizer.generate_token(&credentials).await.unwrap().unwrap();
        let second = authorizer.generate_token(&credentials).await.unwrap().unwrap();

        assert_ne!(first.token_id, second.token_id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let (authorizer, store) = authorizer().await;

        let token = authorizer
            .generate_token(&Credentials::new("someUser", "wrongPassword"))
            .await
            .unwrap();

        assert!(token.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let (authorizer, _) = authorizer().await;

        let token = authorizer
            .generate_token(&Credentials::new("nobody", "somePassword"))
            .await
            .unwrap();

        assert!(token.is_none());
    }

    #[tokio::test]
    async fn validates_issued_token() {
        let (authorizer, _) = authorizer().await;
        let token = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap()
            .unwrap();

        assert!(authorizer.validate_token(&token.token_id).await.unwrap());
        assert!(!authorizer.validate_token("missing").await.unwrap());
    }

    #[tokio::test]
    async fn expired_token_is_invalid_even_when_flagged_valid() {
        let (authorizer, store) = authorizer().await;
        let token = SessionToken::new("expired", "someUser", Utc::now() - Duration::seconds(1), vec![1]);
        store.store(&token).await.unwrap();

        assert!(!authorizer.validate_token("expired").await.unwrap());

        let rights = authorizer.token_rights("expired").await.unwrap();
        assert_eq!(rights.state, TokenState::Expired);
        assert!(rights.access_rights.is_empty());
    }

    #[tokio::test]
    async fn token_flagged_invalid_is_rejected() {
        let (authorizer, store) = authorizer().await;
        let mut token = SessionToken::new("revoked", "someUser", Utc::now() + Duration::hours(1), vec![1]);
        token.valid = false;
        store.store(&token).await.unwrap();

        assert!(!authorizer.validate_token("revoked").await.unwrap());
    }

    #[tokio::test]
    async fn authorize_checks_access_rights() {
        let (authorizer, _) = authorizer().await;
        let token = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap()
            .unwrap();

        assert!(authorizer.authorize(&token.token_id, AccessRight::Read).await.unwrap());
        assert!(!authorizer.authorize(&token.token_id, AccessRight::Delete).await.unwrap());
        assert!(!authorizer.authorize("missing", AccessRight::Read).await.unwrap());
    }

    #[tokio::test]
    async fn revoking_twice_fails() {
        let (authorizer, _) = authorizer().await;
        let token = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap()
            .unwrap();

        authorizer.revoke_token(&token.token_id).await.unwrap();
        assert!(!authorizer.validate_token(&token.token_id).await.unwrap());

        let err = authorizer.revoke_token(&token.token_id).await.unwrap_err();
        assert_eq!(err.to_string(), "SessionToken not deleted!");
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_store()
            .times(1)
            .returning(|_| Err(Error::Body("store unavailable".into())));

        let authorizer = SessionAuthorizer::new(
            Arc::new(store),
            credentials_with_user().await,
            Duration::hours(1),
        );

        let err = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "store unavailable");
    }

    #[tokio::test]
    async fn regenerates_colliding_token_id() {
        let mut store = MockStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Some(SessionToken::new(id, "other", Utc::now(), vec![]))));
        store
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store.expect_store().times(1).returning(|_| Ok(()));

        let authorizer = SessionAuthorizer::new(
            Arc::new(store),
            credentials_with_user().await,
            Duration::hours(1),
        );

        let token = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap();

        assert!(token.is_some());
    }

    #[tokio::test]
    async fn gives_up_after_repeated_collisions() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .times(TOKEN_ID_ATTEMPTS)
            .returning(|id| Ok(Some(SessionToken::new(id, "other", Utc::now(), vec![]))));
        store.expect_store().never();

        let authorizer = SessionAuthorizer::new(
            Arc::new(store),
            credentials_with_user().await,
            Duration::hours(1),
        );

        let err = authorizer
            .generate_token(&Credentials::new("someUser", "somePassword"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TokenIdExhausted));
    }
}
