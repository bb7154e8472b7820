//! PostgreSQL implementations of the store traits.

pub mod catalog;
pub mod grant;
pub mod membership;
pub mod user;

pub use catalog::CatalogRepository;
pub use grant::GrantRepository;
pub use membership::MembershipRepository;
pub use user::UserRepository;
