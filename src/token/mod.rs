pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryTokenStore;
pub use postgres::PgTokenStore;
pub use store::TokenStore;
