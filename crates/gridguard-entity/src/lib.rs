//! # gridguard-entity
//!
//! Domain entity models for GridGuard. Every struct in this crate
//! represents a database table row or a domain value object. Row-shaped
//! entities additionally derive `sqlx::FromRow`.

pub mod grant;
pub mod location;
pub mod member;
pub mod user;
