//! Environment configuration.

use gatehouse_identity::provisioning::{
    DEFAULT_ADMINISTRATOR_ROLE, DEFAULT_ADMINISTRATOR_USERNAME, ProvisioningSettings,
};

pub const PEPPER_VAR: &str = "GATEHOUSE_CREDENTIAL_PEPPER";
pub const ADMIN_ROLE_VAR: &str = "GATEHOUSE_ADMIN_ROLE";
pub const ADMIN_USERNAME_VAR: &str = "GATEHOUSE_ADMIN_USERNAME";
pub const LOG_VAR: &str = "GATEHOUSE_LOG";

const DEV_PEPPER: &str = "dev-pepper";

/// Process configuration for a gatehouse deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct IamConfig {
    pub credential_pepper: String,
    pub administrator_role: String,
    pub administrator_username: String,
    /// Overrides `RUST_LOG` when set.
    pub log_filter: Option<String>,
}

impl IamConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let credential_pepper = lookup(PEPPER_VAR).unwrap_or_else(|| {
            tracing::warn!("{PEPPER_VAR} not set; using insecure dev default");
            DEV_PEPPER.to_string()
        });
        let administrator_role = lookup(ADMIN_ROLE_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMINISTRATOR_ROLE.to_string());
        let administrator_username = lookup(ADMIN_USERNAME_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMINISTRATOR_USERNAME.to_string());

        Self {
            credential_pepper,
            administrator_role,
            administrator_username,
            log_filter: lookup(LOG_VAR).filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn provisioning_settings(&self) -> ProvisioningSettings {
        ProvisioningSettings {
            administrator_username: self.administrator_username.clone(),
            administrator_role: self.administrator_role.clone(),
        }
    }
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            credential_pepper: DEV_PEPPER.to_string(),
            administrator_role: DEFAULT_ADMINISTRATOR_ROLE.to_string(),
            administrator_username: DEFAULT_ADMINISTRATOR_USERNAME.to_string(),
            log_filter: None,
        }
    }
}

impl core::fmt::Debug for IamConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IamConfig")
            .field("credential_pepper", &"[REDACTED]")
            .field("administrator_role", &self.administrator_role)
            .field("administrator_username", &self.administrator_username)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}
