//! Permission grant domain entities.

pub mod model;
pub mod scope;
pub mod target;
pub mod view;

pub use model::{CreateGrantRequest, GrantPatch, NewGrant, PermissionGrant};
pub use scope::{ResourceRef, ResourceScope};
pub use target::{GrantTarget, TargetType};
pub use view::GrantView;
