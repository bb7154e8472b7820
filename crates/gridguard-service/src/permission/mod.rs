//! Grant management and access resolution.

pub mod location;
pub mod service;

pub use location::LocatedResource;
pub use service::GrantService;
