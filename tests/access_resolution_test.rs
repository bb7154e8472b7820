//! Integration tests for effective access and visible-resource listing.

mod helpers;

use gridguard_auth::{Actor, DecisionSource};
use gridguard_core::ErrorKind;
use gridguard_core::types::UserId;
use gridguard_entity::grant::{ResourceScope, TargetType};
use gridguard_entity::member::MemberRole;

use helpers::{TestApp, all_members, for_role, for_user};

#[tokio::test]
async fn test_no_grants_means_full_access() {
    let app = TestApp::new();
    for user in [&app.member, &app.outsider, &app.owner] {
        assert_eq!(app.access(user, app.table_ref()).await, (true, true));
        assert_eq!(app.access(user, app.cell_ref(0, 0)).await, (true, true));
    }
}

#[tokio::test]
async fn test_all_members_view_only() {
    let app = TestApp::new();
    app.grant(&app.owner, app.column_ref(1), all_members(true, false))
        .await
        .unwrap();

    assert_eq!(app.access(&app.member, app.column_ref(1)).await, (true, false));
    assert_eq!(app.access(&app.member, app.column_ref(0)).await, (true, true));
}

#[tokio::test]
async fn test_role_grant_overrides_all_members() {
    let app = TestApp::new();
    app.grant(&app.owner, app.record_ref(0), for_role("member", true, true))
        .await
        .unwrap();
    app.grant(&app.owner, app.record_ref(0), all_members(false, false))
        .await
        .unwrap();

    assert_eq!(app.access(&app.member, app.record_ref(0)).await, (true, true));
    // Not a member: role grants never match, the all-members grant does.
    assert_eq!(
        app.access(&app.outsider, app.record_ref(0)).await,
        (false, false)
    );
}

#[tokio::test]
async fn test_user_grant_overrides_role_grant() {
    let app = TestApp::new();
    app.grant(&app.owner, app.cell_ref(1, 1), for_role("member", true, true))
        .await
        .unwrap();
    let personal = app
        .grant(&app.owner, app.cell_ref(1, 1), for_user(app.member.id, true, false))
        .await
        .unwrap();

    let decision = app
        .service
        .effective_access(&app.actor(&app.member), app.cell_ref(1, 1))
        .await
        .unwrap();
    assert!(decision.can_view);
    assert!(!decision.can_edit);
    assert_eq!(
        decision.source,
        DecisionSource::Grant {
            grant_id: personal.grant.id,
            target_type: TargetType::SpecificUser,
        }
    );
}

#[tokio::test]
async fn test_grant_for_someone_else_falls_back_to_default() {
    let app = TestApp::new();
    app.grant(&app.owner, app.table_ref(), for_user(app.outsider.id, false, false))
        .await
        .unwrap();

    let decision = app
        .service
        .effective_access(&app.actor(&app.member), app.table_ref())
        .await
        .unwrap();
    assert!(decision.can_view && decision.can_edit);
    assert_eq!(decision.source, DecisionSource::NoApplicableGrant);
}

#[tokio::test]
async fn test_owner_named_in_restrictive_grant_keeps_full_access() {
    let app = TestApp::new();
    app.grant(&app.owner, app.column_ref(0), for_user(app.owner.id, false, false))
        .await
        .unwrap();
    app.grant(&app.owner, app.column_ref(0), for_user(app.manager.id, false, false))
        .await
        .unwrap();

    assert_eq!(app.access(&app.owner, app.column_ref(0)).await, (true, true));
    assert_eq!(app.access(&app.manager, app.column_ref(0)).await, (true, true));
}

#[tokio::test]
async fn test_super_admin_bypasses_without_membership() {
    let app = TestApp::new();
    app.grant(&app.owner, app.table_ref(), all_members(false, false))
        .await
        .unwrap();

    let decision = app
        .service
        .effective_access(&app.actor(&app.admin), app.table_ref())
        .await
        .unwrap();
    assert!(decision.can_view && decision.can_edit);
    assert_eq!(decision.source, DecisionSource::PrivilegedBypass);
}

#[tokio::test]
async fn test_hidden_resource_cannot_be_edited() {
    let app = TestApp::new();
    let stored = app
        .grant(&app.owner, app.record_ref(2), all_members(false, true))
        .await
        .unwrap();
    assert!(stored.grant.can_edit, "stored as given");

    assert_eq!(
        app.access(&app.member, app.record_ref(2)).await,
        (false, false)
    );
}

#[tokio::test]
async fn test_require_view_and_edit() {
    let app = TestApp::new();
    app.grant(&app.owner, app.column_ref(2), all_members(true, false))
        .await
        .unwrap();
    let member = app.actor(&app.member);

    app.service
        .require_view(&member, app.column_ref(2))
        .await
        .expect("view allowed");
    let err = app
        .service
        .require_edit(&member, app.column_ref(2))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PermissionDenied);

    app.service
        .require_edit(&app.actor(&app.manager), app.column_ref(2))
        .await
        .expect("manager bypasses");
}

#[tokio::test]
async fn test_unknown_resource() {
    let app = TestApp::new();
    let err = app
        .service
        .effective_access(
            &app.actor(&app.member),
            gridguard_entity::grant::ResourceRef::Record {
                record_id: gridguard_core::types::RecordId::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_visible_columns() {
    let app = TestApp::new();
    app.grant(&app.owner, app.column_ref(1), all_members(false, false))
        .await
        .unwrap();
    app.grant(&app.owner, app.column_ref(2), for_user(app.member.id, false, false))
        .await
        .unwrap();

    let visible = app
        .service
        .visible_resources(&app.actor(&app.member), app.table.id, ResourceScope::Column)
        .await
        .unwrap();
    assert_eq!(visible, vec![app.column_ref(0)]);

    let visible = app
        .service
        .visible_resources(&app.actor(&app.outsider), app.table.id, ResourceScope::Column)
        .await
        .unwrap();
    assert_eq!(visible, vec![app.column_ref(0), app.column_ref(2)]);

    let visible = app
        .service
        .visible_resources(&app.actor(&app.manager), app.table.id, ResourceScope::Column)
        .await
        .unwrap();
    assert_eq!(visible.len(), 3);
}

#[tokio::test]
async fn test_visible_records() {
    let app = TestApp::new();
    app.grant(&app.owner, app.record_ref(0), for_role("member", false, false))
        .await
        .unwrap();

    let visible = app
        .service
        .visible_resources(&app.actor(&app.member), app.table.id, ResourceScope::Record)
        .await
        .unwrap();
    assert_eq!(visible, vec![app.record_ref(1), app.record_ref(2)]);

    let err = app
        .service
        .visible_resources(&app.actor(&app.member), app.table.id, ResourceScope::Cell)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_role_change_applies_after_invalidation() {
    let app = TestApp::new();
    app.grant(&app.owner, app.table_ref(), all_members(false, false))
        .await
        .unwrap();
    assert_eq!(app.access(&app.member, app.table_ref()).await, (false, false));

    app.catalog
        .add_member(app.member.id, app.database_id, MemberRole::Manager);
    app.service
        .roles()
        .invalidate(app.member.id, app.database_id)
        .await;

    assert_eq!(app.access(&app.member, app.table_ref()).await, (true, true));
}

#[tokio::test]
async fn test_unregistered_actor_is_lowest_privilege() {
    let app = TestApp::new();
    app.grant(&app.owner, app.table_ref(), for_role("member", true, false))
        .await
        .unwrap();

    let stranger = Actor::user(UserId::new());
    let decision = app
        .service
        .effective_access(&stranger, app.table_ref())
        .await
        .unwrap();
    assert!(decision.can_view && decision.can_edit);
    assert_eq!(decision.source, DecisionSource::NoApplicableGrant);
}
