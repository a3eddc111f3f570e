pub mod request;
pub mod token;
pub mod user;

pub use request::Credentials;
pub use token::{AccessRight, SessionToken, TokenRights, TokenState};
pub use user::{UserAccount, Username};
