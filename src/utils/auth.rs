use axum::http::{HeaderMap, header};

use crate::core::error::Error;

/// Extracts the token id from an `Authorization: Bearer <id>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(Error::NoCredentials)?;

    let mut header = auth_header.to_str()?.split_whitespace();

    match (header.next(), header.next(), header.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(Error::NoCredentials),
    }
}
