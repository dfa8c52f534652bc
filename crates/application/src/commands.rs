//! Commands accepted by the application services.
//!
//! Fields are flat primitives (ids as strings, optional timestamps) so the
//! structs double as the wire shape of any outer façade.

use chrono::{DateTime, Utc};
use gatehouse_identity::PlainPassword;
use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Shared field sets
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub street_name: String,
    #[serde(default)]
    pub building_number: String,
    pub postal_code: String,
    pub town: String,
    pub state_province: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub email_address: String,
    pub primary_telephone: String,
    /// Blank means "none".
    #[serde(default)]
    pub secondary_telephone: String,
    #[serde(flatten)]
    pub address: AddressFields,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tenant
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionTenant {
    pub tenant_name: String,
    pub tenant_description: String,
    pub administrator_first_name: String,
    pub administrator_last_name: String,
    #[serde(flatten)]
    pub contact: ContactFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTenant {
    pub tenant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateTenant {
    pub tenant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferInvitation {
    pub tenant_id: String,
    pub description: String,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawInvitation {
    pub tenant_id: String,
    /// Invitation id or description.
    pub invitation_identifier: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub tenant_id: String,
    pub invitation_identifier: String,
    pub username: String,
    pub password: PlainPassword,
    pub first_name: String,
    pub last_name: String,
    pub enabled: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub contact: ContactFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateUser {
    pub tenant_id: String,
    pub username: String,
    pub password: PlainPassword,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeContactInformation {
    pub tenant_id: String,
    pub username: String,
    #[serde(flatten)]
    pub contact: ContactFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailAddress {
    pub tenant_id: String,
    pub username: String,
    pub email_address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePostalAddress {
    pub tenant_id: String,
    pub username: String,
    #[serde(flatten)]
    pub address: AddressFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePrimaryTelephone {
    pub tenant_id: String,
    pub username: String,
    pub primary_telephone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSecondaryTelephone {
    pub tenant_id: String,
    pub username: String,
    /// Blank clears the secondary telephone.
    #[serde(default)]
    pub secondary_telephone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserPassword {
    pub tenant_id: String,
    pub username: String,
    pub current_password: PlainPassword,
    pub changed_password: PlainPassword,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserPersonalName {
    pub tenant_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineUserEnablement {
    pub tenant_id: String,
    pub username: String,
    pub enabled: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Group
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionGroup {
    pub tenant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupToGroup {
    pub tenant_id: String,
    pub group_name: String,
    pub child_group_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserToGroup {
    pub tenant_id: String,
    pub group_name: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveGroupFromGroup {
    pub tenant_id: String,
    pub group_name: String,
    pub child_group_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUserFromGroup {
    pub tenant_id: String,
    pub group_name: String,
    pub username: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRole {
    pub tenant_id: String,
    pub role_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub supports_nesting: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserToRole {
    pub tenant_id: String,
    pub role_name: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignUserFromRole {
    pub tenant_id: String,
    pub role_name: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignGroupToRole {
    pub tenant_id: String,
    pub role_name: String,
    pub group_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignGroupFromRole {
    pub tenant_id: String,
    pub role_name: String,
    pub group_name: String,
}
