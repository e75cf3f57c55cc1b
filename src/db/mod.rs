pub mod memory;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use memory::InMemoryRequestStore;
pub use queries::requests::PgRequestStore;
pub use store::RequestStore;
