pub(crate) mod auth;
pub mod body;
