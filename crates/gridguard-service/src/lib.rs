//! # gridguard-service
//!
//! Application services for GridGuard. [`GrantService`] manages grants on
//! tables, columns, records and cells and answers access questions for
//! acting users.
//!
//! Services follow constructor injection: stores and resolvers are handed
//! in at construction time.

pub mod context;
pub mod permission;

pub use context::RequestContext;
pub use permission::{GrantService, LocatedResource};
