//! Infrastructure layer: repository implementations

pub mod memory;
pub mod postgres;

pub use memory::MemoryAuthStore;
pub use postgres::PgAuthStore;
