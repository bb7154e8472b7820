//! Membership role resolution.

pub mod resolver;

pub use resolver::RoleResolver;
