//! Platform user entities.

pub mod model;

pub use model::{User, UserSummary};
