//! Grant resolution: one engine for table, column, record and cell grants.

pub mod filter;
pub mod resolver;

pub use filter::{filter_viewable, group_by_resource};
pub use resolver::{AccessDecision, DecisionSource, resolve};
