pub mod authorizer;
pub mod credentials;
