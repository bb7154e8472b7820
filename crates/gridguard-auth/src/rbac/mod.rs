//! Role-based checks inside a database.

pub mod enforcer;

pub use enforcer::{RbacEnforcer, bypasses_grants};
