//! # gridguard-database
//!
//! Storage for GridGuard: the store traits the permission engine consumes,
//! PostgreSQL connection management and repository implementations, and
//! in-memory stores for tests and embedded use.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    GrantStore, MemoryCatalog, MemoryGrantStore, MembershipStore, ResourceLocator, Stores,
    UserDirectory,
};
