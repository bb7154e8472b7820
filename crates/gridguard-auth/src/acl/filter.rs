//! Viewable-set filtering over sibling resources.

use std::collections::HashMap;
use std::hash::Hash;

use gridguard_entity::grant::{PermissionGrant, ResourceRef};
use gridguard_entity::member::MemberRole;

use crate::actor::Actor;
use crate::rbac::bypasses_grants;

use super::resolver::resolve;

/// Group grants by the resource they are attached to.
pub fn group_by_resource(
    grants: impl IntoIterator<Item = PermissionGrant>,
) -> HashMap<ResourceRef, Vec<PermissionGrant>> {
    let mut grouped: HashMap<ResourceRef, Vec<PermissionGrant>> = HashMap::new();
    for grant in grants {
        grouped.entry(grant.resource).or_default().push(grant);
    }
    grouped
}

/// Keep the resources the actor may view, preserving input order.
///
/// Actors who bypass grant resolution see everything; the grant map is
/// not consulted for them. Resources missing from the map have no grants.
pub fn filter_viewable<K>(
    resources: impl IntoIterator<Item = K>,
    grants_by_resource: &HashMap<K, Vec<PermissionGrant>>,
    actor: &Actor,
    role: Option<MemberRole>,
) -> Vec<K>
where
    K: Eq + Hash,
{
    if bypasses_grants(actor, role) {
        return resources.into_iter().collect();
    }

    resources
        .into_iter()
        .filter(|key| {
            let grants = grants_by_resource.get(key).map_or(&[][..], Vec::as_slice);
            resolve(grants, actor, role).can_view
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gridguard_core::types::{ColumnId, DatabaseId, TableId, UserId};
    use gridguard_entity::grant::{GrantTarget, NewGrant};

    fn column_grant(
        column_id: ColumnId,
        target: GrantTarget,
        can_view: bool,
    ) -> PermissionGrant {
        NewGrant {
            resource: ResourceRef::Column { column_id },
            table_id: TableId::new(),
            database_id: DatabaseId::new(),
            target,
            can_view,
            can_edit: false,
            name: "Price".to_string(),
            note: String::new(),
            is_default: false,
            created_by: None,
        }
        .into_grant(Utc::now())
    }

    #[test]
    fn test_hidden_columns_are_dropped_in_order() {
        let columns: Vec<ColumnId> = (0..4).map(|_| ColumnId::new()).collect();
        let refs: Vec<ResourceRef> = columns
            .iter()
            .map(|&column_id| ResourceRef::Column { column_id })
            .collect();
        let grouped = group_by_resource(vec![
            column_grant(columns[1], GrantTarget::AllMembers, false),
            column_grant(columns[3], GrantTarget::AllMembers, true),
        ]);

        let actor = Actor::user(UserId::new());
        let visible = filter_viewable(refs.clone(), &grouped, &actor, Some(MemberRole::Member));
        assert_eq!(visible, vec![refs[0], refs[2], refs[3]]);
    }

    #[test]
    fn test_managers_see_everything() {
        let column_id = ColumnId::new();
        let resource = ResourceRef::Column { column_id };
        let grouped = group_by_resource(vec![column_grant(
            column_id,
            GrantTarget::AllMembers,
            false,
        )]);

        let actor = Actor::user(UserId::new());
        let visible = filter_viewable([resource], &grouped, &actor, Some(MemberRole::Manager));
        assert_eq!(visible, vec![resource]);

        let visible = filter_viewable([resource], &grouped, &actor, Some(MemberRole::Member));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_group_by_resource() {
        let column_id = ColumnId::new();
        let user_id = UserId::new();
        let grouped = group_by_resource(vec![
            column_grant(column_id, GrantTarget::AllMembers, true),
            column_grant(column_id, GrantTarget::SpecificUser { user_id }, false),
        ]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&ResourceRef::Column { column_id }].len(), 2);
    }
}
