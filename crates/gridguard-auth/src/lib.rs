//! # gridguard-auth
//!
//! Authorization for GridGuard grids.
//!
//! ## Modules
//!
//! - `actor`: the acting user as seen by authorization
//! - `acl`: grant resolution and viewable-set filtering
//! - `rbac`: database role checks (bypass and grant management)
//! - `membership`: cached `(user, database) -> role` resolution

pub mod acl;
pub mod actor;
pub mod membership;
pub mod rbac;

pub use acl::{AccessDecision, DecisionSource, filter_viewable, resolve};
pub use actor::Actor;
pub use membership::RoleResolver;
pub use rbac::RbacEnforcer;
