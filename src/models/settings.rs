//! Shared application settings and login session.

use serde::{Deserialize, Serialize};

/// Role attached to a session. Admin unlocks every mutating operation of the
/// editors; the gate itself is a shared-password check, not access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// A logged-in session, persisted locally so a restart keeps the user in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub email: String,
    pub role: UserRole,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Admin-editable configuration shared by every session, mirrored live so a
/// password change propagates without a manual sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub global_user_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    pub maintenance_mode: bool,
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dev_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cloud_sync: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            global_user_password: "123".to_string(),
            admin_password: Some("admin".to_string()),
            maintenance_mode: false,
            last_updated: chrono::Utc::now().to_rfc3339(),
            custom_logo: None,
            custom_dev_photo: None,
            last_cloud_sync: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "ADMIN");
        assert_eq!(serde_json::to_value(UserRole::User).unwrap(), "USER");
    }

    #[test]
    fn test_settings_wire_names() {
        let settings = AppSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("globalUserPassword").is_some());
        assert!(json.get("maintenanceMode").is_some());
        assert!(json.get("lastUpdated").is_some());
    }
}
