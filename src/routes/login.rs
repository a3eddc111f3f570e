use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::controllers::authorizer::Authorizer;
use crate::core::error::{Error, internal_error};
use crate::core::state::AppState;
use crate::types::SessionToken;
use crate::utils::body::{AxumBodyReader, BodyReader};

pub(crate) const WRONG_CREDENTIALS: &str = "wrong username or password";

/// Per-request controller for the login endpoint.
///
/// `OPTIONS` is acknowledged, `POST` attempts a login, and every other method
/// is left unanswered so an outer layer can supply the default response.
pub struct LoginHandler<'a, A: Authorizer + ?Sized> {
    authorizer: &'a A,
}

impl<'a, A: Authorizer + ?Sized> LoginHandler<'a, A> {
    pub fn new(authorizer: &'a A) -> Self {
        Self { authorizer }
    }

    /// Returns `None` when the method is not handled; no response is written.
    pub async fn handle_request<R: BodyReader>(
        &self,
        method: &Method,
        body: R,
    ) -> Option<Response> {
        match *method {
            Method::OPTIONS => Some(StatusCode::OK.into_response()),
            Method::POST => Some(self.handle_post(body).await),
            _ => None,
        }
    }

    async fn handle_post<R: BodyReader>(&self, body: R) -> Response {
        match self.login(body).await {
            Ok(Some(token)) => match serde_json::to_string(&token) {
                Ok(json) => (
                    StatusCode::CREATED,
                    [(header::CONTENT_TYPE, "application/json")],
                    json,
                )
                    .into_response(),
                Err(e) => internal_error(&Error::Serialize(e)),
            },
            Ok(None) => (StatusCode::NOT_FOUND, WRONG_CREDENTIALS).into_response(),
            Err(e) => internal_error(&e),
        }
    }

    async fn login<R: BodyReader>(&self, body: R) -> Result<Option<SessionToken>, Error> {
        let credentials = body.read_credentials().await?;

        self.authorizer.generate_token(&credentials).await
    }
}

#[instrument(skip_all, fields(method = %method))]
pub(crate) async fn handle(
    State(state): State<AppState>,
    method: Method,
    request: Request,
) -> Response {
    let body = AxumBodyReader::new(request.into_body(), state.body_limits);

    match LoginHandler::new(state.authorizer.as_ref())
        .handle_request(&method, body)
        .await
    {
        Some(response) => response,
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
