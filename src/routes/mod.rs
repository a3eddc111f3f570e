pub mod login;
pub mod router;
pub(crate) mod session;
