//! Database membership entities.

pub mod model;
pub mod role;

pub use model::{MemberView, Membership};
pub use role::MemberRole;
