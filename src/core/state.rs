use std::sync::Arc;

use crate::controllers::authorizer::Authorizer;
use crate::core::config::BodyLimits;
use crate::token::TokenStore;

#[derive(Clone)]
pub struct AppState {
    pub(crate) authorizer: Arc<dyn Authorizer>,
    pub(crate) token_store: Arc<dyn TokenStore>,
    pub(crate) body_limits: BodyLimits,
}

impl AppState {
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        token_store: Arc<dyn TokenStore>,
        body_limits: BodyLimits,
    ) -> Self {
        Self {
            authorizer,
            token_store,
            body_limits,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("body_limits", &self.body_limits)
            .finish_non_exhaustive()
    }
}
