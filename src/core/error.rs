use axum::BoxError;
use axum::http::StatusCode;
use axum::http::header::ToStrError;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Invalid setting {0}: {1}")]
    InvalidSetting(&'static str, String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SessionToken not deleted!")]
    NotDeleted,
    #[error("{0}")]
    Sql(#[from] sqlx::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Body(String),
    #[error("request body read timed out")]
    BodyTimeout,
    #[error("Header decode error: {0}")]
    HeaderDecode(#[from] ToStrError),
    #[error("Task error: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Could not allocate a unique token id")]
    TokenIdExhausted,
    #[error("Token expiration time out of range")]
    ExpirationOutOfRange,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotDeleted => {
                let message = Error::NotDeleted.to_string();
                tracing::warn!("{}", message);
                (StatusCode::NOT_FOUND, message).into_response()
            }
            Error::NoCredentials => {
                (StatusCode::UNAUTHORIZED, "No credentials provided").into_response()
            }
            Error::HeaderDecode(_) => {
                (StatusCode::BAD_REQUEST, "Header decode error").into_response()
            }
            e => internal_error(&e),
        }
    }
}

/// Renders any failure as a 500 carrying the error's message.
pub(crate) fn internal_error(error: &Error) -> Response {
    tracing::error!("{:?}", error);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Internal error: {}", error),
    )
        .into_response()
}

pub(crate) async fn handle_middleware_errors(err: BoxError) -> (StatusCode, String) {
    tracing::error!("Unhandled error: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Internal error: {}", err),
    )
}
