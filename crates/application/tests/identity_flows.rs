mod support;

use chrono::{Duration, Utc};
use gatehouse_application::commands::{
    ActivateTenant, AddGroupToGroup, AddUserToGroup, AssignGroupToRole, AssignUserToRole,
    AuthenticateUser, ChangeEmailAddress, ChangeSecondaryTelephone, ChangeUserPassword,
    DeactivateTenant, DefineUserEnablement, OfferInvitation, ProvisionGroup, ProvisionRole,
    RemoveUserFromGroup, UnassignUserFromRole, WithdrawInvitation,
};
use gatehouse_core::ErrorCode;
use gatehouse_identity::PlainPassword;
use support::{PASSWORD, TestSystem, register_user};

fn authenticate(sys: &TestSystem, username: &str, password: &str) -> AuthenticateUser {
    AuthenticateUser {
        tenant_id: sys.tenant_id.clone(),
        username: username.to_string(),
        password: PlainPassword::new(password),
    }
}

fn provision_group(sys: &TestSystem, name: &str) -> anyhow::Result<()> {
    sys.app.groups.provision_group(ProvisionGroup {
        tenant_id: sys.tenant_id.clone(),
        name: name.to_string(),
        description: format!("{name} group"),
    })?;
    Ok(())
}

fn provision_role(sys: &TestSystem, name: &str, supports_nesting: bool) -> anyhow::Result<()> {
    sys.app.roles.provision_role(ProvisionRole {
        tenant_id: sys.tenant_id.clone(),
        role_name: name.to_string(),
        description: format!("{name} role"),
        supports_nesting,
    })?;
    Ok(())
}

fn nest(sys: &TestSystem, parent: &str, child: &str) -> gatehouse_core::DomainResult<bool> {
    sys.app.groups.add_group_to_group(AddGroupToGroup {
        tenant_id: sys.tenant_id.clone(),
        group_name: parent.to_string(),
        child_group_name: child.to_string(),
    })
}

fn add_user(sys: &TestSystem, group: &str, username: &str) -> anyhow::Result<bool> {
    Ok(sys.app.groups.add_user_to_group(AddUserToGroup {
        tenant_id: sys.tenant_id.clone(),
        group_name: group.to_string(),
        username: username.to_string(),
    })?)
}

fn disable(sys: &TestSystem, username: &str) -> anyhow::Result<()> {
    sys.app.users.define_user_enablement(DefineUserEnablement {
        tenant_id: sys.tenant_id.clone(),
        username: username.to_string(),
        enabled: false,
        start_date: None,
        end_date: None,
    })?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Provisioning
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn provisioned_administrator_can_sign_in_and_holds_role() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;

    let admin = sys
        .app
        .users
        .authenticate_user(authenticate(&sys, "admin", sys.admin_password.as_str()))?;
    assert_eq!(admin.map(|d| d.name), Some("Grace Hopper".to_string()));
    assert!(sys.app.roles.is_user_in_role(&sys.tenant_id, "admin", "Administrator")?);
    assert!(sys.app.tenants.available_invitations(&sys.tenant_id)?.is_empty());
    Ok(())
}

#[test]
fn duplicate_tenant_name_conflicts() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;

    let err = sys
        .app
        .tenants
        .provision_tenant(support::provision_tenant("Acme"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Invitations and registration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn registration_consumes_invitation() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.invite("welcome")?;
    assert_eq!(sys.app.tenants.available_invitations(&sys.tenant_id)?.len(), 1);

    let alice = sys
        .app
        .users
        .register_user(register_user(&sys.tenant_id, "welcome", "alice"))?;
    assert_eq!(alice.username, "alice");
    assert!(sys.app.tenants.available_invitations(&sys.tenant_id)?.is_empty());

    let err = sys
        .app
        .users
        .register_user(register_user(&sys.tenant_id, "welcome", "bob"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    Ok(())
}

#[test]
fn registration_publishes_withdrawal_then_user() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.invite("welcome")?;
    sys.published();

    sys.app
        .users
        .register_user(register_user(&sys.tenant_id, "welcome", "alice"))?;

    assert_eq!(
        sys.published(),
        vec!["identity.tenant.invitation_withdrawn", "identity.user.registered"]
    );
    Ok(())
}

#[test]
fn duplicate_username_keeps_invitation() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    sys.invite("second")?;

    let err = sys
        .app
        .users
        .register_user(register_user(&sys.tenant_id, "second", "alice"))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(sys.app.tenants.available_invitations(&sys.tenant_id)?.len(), 1);
    Ok(())
}

#[test]
fn future_window_makes_invitation_unavailable() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    let now = Utc::now();
    sys.app.tenants.offer_invitation(OfferInvitation {
        tenant_id: sys.tenant_id.clone(),
        description: "later".to_string(),
        valid_from: Some(now + Duration::days(1)),
        valid_to: Some(now + Duration::days(2)),
    })?;

    assert!(sys.app.tenants.available_invitations(&sys.tenant_id)?.is_empty());
    let err = sys
        .app
        .users
        .register_user(register_user(&sys.tenant_id, "later", "alice"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    Ok(())
}

#[test]
fn inverted_window_offers_nothing() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    let now = Utc::now();

    let err = sys
        .app
        .tenants
        .offer_invitation(OfferInvitation {
            tenant_id: sys.tenant_id.clone(),
            description: "broken".to_string(),
            valid_from: Some(now + Duration::days(2)),
            valid_to: Some(now),
        })
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Invalid);
    assert!(sys.published().is_empty());
    sys.invite("broken")?;
    Ok(())
}

#[test]
fn withdrawn_invitation_cannot_be_redeemed() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    let invitation_id = sys.invite("welcome")?;

    let withdrawn = sys.app.tenants.withdraw_invitation(WithdrawInvitation {
        tenant_id: sys.tenant_id.clone(),
        invitation_identifier: invitation_id.clone(),
    })?;
    assert!(withdrawn);
    assert!(!sys.app.tenants.withdraw_invitation(WithdrawInvitation {
        tenant_id: sys.tenant_id.clone(),
        invitation_identifier: invitation_id,
    })?);

    let err = sys
        .app
        .users
        .register_user(register_user(&sys.tenant_id, "welcome", "alice"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tenant lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn deactivated_tenant_refuses_sign_in_and_invitations() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;

    sys.app.tenants.deactivate_tenant(DeactivateTenant {
        tenant_id: sys.tenant_id.clone(),
    })?;
    assert_eq!(sys.app.users.authenticate_user(authenticate(&sys, "alice", PASSWORD))?, None);
    let err = sys.invite("late").unwrap_err();
    assert_eq!(
        err.downcast_ref::<gatehouse_core::DomainError>().map(|e| e.code()),
        Some(ErrorCode::Invalid)
    );

    sys.app.tenants.activate_tenant(ActivateTenant {
        tenant_id: sys.tenant_id.clone(),
    })?;
    assert!(sys.app.users.authenticate_user(authenticate(&sys, "alice", PASSWORD))?.is_some());
    Ok(())
}

#[test]
fn activating_active_tenant_publishes_nothing() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;

    sys.app.tenants.activate_tenant(ActivateTenant {
        tenant_id: sys.tenant_id.clone(),
    })?;
    assert!(sys.published().is_empty());
    Ok(())
}

#[test]
fn unknown_or_malformed_tenant_is_reported() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;

    let missing = sys
        .app
        .tenants
        .activate_tenant(ActivateTenant {
            tenant_id: gatehouse_core::TenantId::new().to_string(),
        })
        .unwrap_err();
    assert_eq!(missing.code(), ErrorCode::NotFound);

    let malformed = sys
        .app
        .tenants
        .activate_tenant(ActivateTenant {
            tenant_id: "not-a-uuid".to_string(),
        })
        .unwrap_err();
    assert_eq!(malformed.code(), ErrorCode::Invalid);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn wrong_password_is_indistinguishable_from_unknown_user() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;

    let wrong = sys.app.users.authenticate_user(authenticate(&sys, "alice", "wrong"))?;
    let unknown = sys.app.users.authenticate_user(authenticate(&sys, "nobody", PASSWORD))?;

    assert_eq!(wrong, None);
    assert_eq!(wrong, unknown);
    Ok(())
}

#[test]
fn changed_password_replaces_old_one() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;

    sys.app.users.change_user_password(ChangeUserPassword {
        tenant_id: sys.tenant_id.clone(),
        username: "alice".to_string(),
        current_password: PlainPassword::new(PASSWORD),
        changed_password: PlainPassword::new("N3w&Better#Pass"),
    })?;

    assert_eq!(sys.app.users.authenticate_user(authenticate(&sys, "alice", PASSWORD))?, None);
    assert!(sys
        .app
        .users
        .authenticate_user(authenticate(&sys, "alice", "N3w&Better#Pass"))?
        .is_some());
    Ok(())
}

#[test]
fn password_change_needs_current_password() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    sys.published();

    let err = sys
        .app
        .users
        .change_user_password(ChangeUserPassword {
            tenant_id: sys.tenant_id.clone(),
            username: "alice".to_string(),
            current_password: PlainPassword::new("guess"),
            changed_password: PlainPassword::new("N3w&Better#Pass"),
        })
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Invalid);
    assert!(sys.published().is_empty());
    Ok(())
}

#[test]
fn contact_changes_publish_only_real_changes() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    sys.published();

    let change = |email: &str| ChangeEmailAddress {
        tenant_id: sys.tenant_id.clone(),
        username: "alice".to_string(),
        email_address: email.to_string(),
    };
    sys.app.users.change_email_address(change("alice@example.com"))?;
    assert!(sys.published().is_empty());

    sys.app.users.change_email_address(change("alice@wonderland.org"))?;
    assert_eq!(sys.published(), vec!["identity.user.contact_information_changed"]);

    let descriptor = sys
        .app
        .users
        .authenticate_user(authenticate(&sys, "alice", PASSWORD))?
        .ok_or_else(|| anyhow::anyhow!("alice should sign in"))?;
    assert_eq!(descriptor.email_address.as_str(), "alice@wonderland.org");
    Ok(())
}

#[test]
fn secondary_telephone_can_be_set_and_cleared() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    sys.published();

    let change = |number: &str| ChangeSecondaryTelephone {
        tenant_id: sys.tenant_id.clone(),
        username: "alice".to_string(),
        secondary_telephone: number.to_string(),
    };
    sys.app.users.change_secondary_telephone(change("(555)987-6543"))?;
    sys.app.users.change_secondary_telephone(change(""))?;
    assert_eq!(sys.published().len(), 2);

    let err = sys.app.users.change_secondary_telephone(change("12")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    Ok(())
}

#[test]
fn changes_to_unknown_user_are_not_found() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;

    let err = disable(&sys, "ghost").unwrap_err();
    assert_eq!(
        err.downcast_ref::<gatehouse_core::DomainError>().map(|e| e.code()),
        Some(ErrorCode::NotFound)
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn nested_group_membership() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    provision_group(&sys, "Eng")?;
    provision_group(&sys, "Backend")?;

    assert!(nest(&sys, "Eng", "Backend")?);
    assert!(add_user(&sys, "Backend", "alice")?);
    assert!(!add_user(&sys, "Backend", "alice")?);

    assert!(sys.app.groups.is_user_in_group(&sys.tenant_id, "Eng", "alice")?);
    assert!(sys.app.groups.is_user_in_group(&sys.tenant_id, "Backend", "alice")?);

    disable(&sys, "alice")?;
    assert!(!sys.app.groups.is_user_in_group(&sys.tenant_id, "Eng", "alice")?);
    Ok(())
}

#[test]
fn nesting_cannot_close_a_cycle() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    provision_group(&sys, "Eng")?;
    provision_group(&sys, "Backend")?;
    provision_group(&sys, "Platform")?;
    nest(&sys, "Eng", "Backend")?;
    nest(&sys, "Backend", "Platform")?;
    sys.published();

    assert_eq!(nest(&sys, "Backend", "Eng").unwrap_err().code(), ErrorCode::Conflict);
    assert_eq!(nest(&sys, "Platform", "Eng").unwrap_err().code(), ErrorCode::Conflict);
    assert_eq!(nest(&sys, "Eng", "Eng").unwrap_err().code(), ErrorCode::Conflict);
    assert!(sys.published().is_empty());
    Ok(())
}

#[test]
fn removing_user_from_group() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    provision_group(&sys, "Eng")?;
    add_user(&sys, "Eng", "alice")?;

    let remove = || RemoveUserFromGroup {
        tenant_id: sys.tenant_id.clone(),
        group_name: "Eng".to_string(),
        username: "alice".to_string(),
    };
    assert!(sys.app.groups.remove_user_from_group(remove())?);
    assert!(!sys.app.groups.remove_user_from_group(remove())?);
    assert!(!sys.app.groups.is_user_in_group(&sys.tenant_id, "Eng", "alice")?);
    Ok(())
}

#[test]
fn unknown_group_is_not_found() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;

    let err = add_user(&sys, "Nowhere", "alice").unwrap_err();
    assert_eq!(
        err.downcast_ref::<gatehouse_core::DomainError>().map(|e| e.code()),
        Some(ErrorCode::NotFound)
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn disabled_user_is_never_in_role() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("bob")?;
    provision_role(&sys, "Admin", false)?;
    sys.app.roles.assign_user_to_role(AssignUserToRole {
        tenant_id: sys.tenant_id.clone(),
        role_name: "Admin".to_string(),
        username: "bob".to_string(),
    })?;
    assert!(sys.app.roles.is_user_in_role(&sys.tenant_id, "bob", "Admin")?);

    disable(&sys, "bob")?;
    assert!(!sys.app.roles.is_user_in_role(&sys.tenant_id, "bob", "Admin")?);
    Ok(())
}

#[test]
fn non_nesting_role_rejects_groups() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    provision_group(&sys, "Eng")?;
    provision_role(&sys, "Admin", false)?;

    let err = sys
        .app
        .roles
        .assign_group_to_role(AssignGroupToRole {
            tenant_id: sys.tenant_id.clone(),
            role_name: "Admin".to_string(),
            group_name: "Eng".to_string(),
        })
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    Ok(())
}

#[test]
fn role_through_nested_groups() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    provision_group(&sys, "Eng")?;
    provision_group(&sys, "Backend")?;
    nest(&sys, "Eng", "Backend")?;
    add_user(&sys, "Backend", "alice")?;
    provision_role(&sys, "Staff", true)?;

    sys.app.roles.assign_group_to_role(AssignGroupToRole {
        tenant_id: sys.tenant_id.clone(),
        role_name: "Staff".to_string(),
        group_name: "Eng".to_string(),
    })?;

    assert!(sys.app.roles.is_user_in_role(&sys.tenant_id, "alice", "Staff")?);
    assert!(!sys.app.roles.is_user_in_role(&sys.tenant_id, "alice", "Missing")?);
    Ok(())
}

#[test]
fn unassigned_user_leaves_role() -> anyhow::Result<()> {
    let sys = TestSystem::new()?;
    sys.register("alice")?;
    provision_role(&sys, "Admin", false)?;
    sys.app.roles.assign_user_to_role(AssignUserToRole {
        tenant_id: sys.tenant_id.clone(),
        role_name: "Admin".to_string(),
        username: "alice".to_string(),
    })?;
    sys.published();

    let unassigned = sys.app.roles.unassign_user_from_role(UnassignUserFromRole {
        tenant_id: sys.tenant_id.clone(),
        role_name: "Admin".to_string(),
        username: "alice".to_string(),
    })?;

    assert!(unassigned);
    assert_eq!(sys.published(), vec!["identity.role.user_unassigned"]);
    assert!(!sys.app.roles.is_user_in_role(&sys.tenant_id, "alice", "Admin")?);
    Ok(())
}
