//! Cached `(user, database) -> role` resolution.

use std::sync::Arc;

use moka::future::Cache;
use tracing::debug;

use gridguard_core::config::PermissionConfig;
use gridguard_core::result::AppResult;
use gridguard_core::types::{DatabaseId, UserId};
use gridguard_database::store::MembershipStore;
use gridguard_entity::member::MemberRole;

/// Resolves a user's role inside a database.
///
/// Lookups (including "not a member") are cached for the configured TTL.
/// Call [`RoleResolver::invalidate`] after changing a membership.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn MembershipStore>,
    cache: Cache<(UserId, DatabaseId), Option<MemberRole>>,
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}

impl RoleResolver {
    /// Creates a resolver over `store`, sizing the cache from `config`.
    pub fn new(store: Arc<dyn MembershipStore>, config: &PermissionConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.membership_cache_capacity)
            .time_to_live(config.membership_cache_ttl())
            .build();
        Self { store, cache }
    }

    /// The user's role in the database, `None` when not a member.
    pub async fn resolve_role(
        &self,
        user_id: UserId,
        database_id: DatabaseId,
    ) -> AppResult<Option<MemberRole>> {
        let key = (user_id, database_id);
        if let Some(role) = self.cache.get(&key).await {
            return Ok(role);
        }

        let role = self
            .store
            .find_membership(user_id, database_id)
            .await?
            .map(|m| m.role);
        debug!(user_id = %user_id, database_id = %database_id, role = ?role, "Resolved membership");

        self.cache.insert(key, role).await;
        Ok(role)
    }

    /// Drop the cached role of one user in one database.
    pub async fn invalidate(&self, user_id: UserId, database_id: DatabaseId) {
        self.cache.invalidate(&(user_id, database_id)).await;
    }

    /// Drop every cached role.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridguard_database::store::MemoryCatalog;

    #[tokio::test]
    async fn test_resolve_role_and_invalidate() {
        let catalog = MemoryCatalog::new();
        let user = catalog.add_user("Ada", Some("ada@example.com"), false);
        let database_id = DatabaseId::new();
        catalog.add_member(user.id, database_id, MemberRole::Member);

        let resolver = RoleResolver::new(Arc::new(catalog.clone()), &PermissionConfig::default());
        assert_eq!(
            resolver.resolve_role(user.id, database_id).await.unwrap(),
            Some(MemberRole::Member)
        );

        catalog.add_member(user.id, database_id, MemberRole::Manager);
        assert_eq!(
            resolver.resolve_role(user.id, database_id).await.unwrap(),
            Some(MemberRole::Member),
            "stale until invalidated"
        );

        resolver.invalidate(user.id, database_id).await;
        assert_eq!(
            resolver.resolve_role(user.id, database_id).await.unwrap(),
            Some(MemberRole::Manager)
        );
    }

    #[tokio::test]
    async fn test_non_member_resolves_to_none() {
        let catalog = MemoryCatalog::new();
        let resolver = RoleResolver::new(Arc::new(catalog), &PermissionConfig::default());
        assert_eq!(
            resolver
                .resolve_role(UserId::new(), DatabaseId::new())
                .await
                .unwrap(),
            None
        );
    }
}
