//! Shared-password login gate.
//!
//! The portal does not hold per-user accounts. A single staff password and a
//! single admin password (both kept in the settings singleton) decide the
//! role of a session. Comparisons are constant-time to mitigate timing
//! attacks; the session itself is persisted locally so a restart keeps the
//! user signed in.

use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::{AppSettings, UserRole, UserSession};
use crate::store::{keys, CacheStore};

/// Professional mail domains accepted at login.
pub const ALLOWED_DOMAINS: &[&str] = &["men.gov.ma", "taalim.ma"];

const ADMIN_DISPLAY_NAME: &str = "المدير(ة) العام(ة)";

/// Resolve a submitted password to a role. The admin password wins when both
/// match. Returns `None` when neither matches.
pub fn resolve_role(settings: &AppSettings, password: &str) -> Option<UserRole> {
    if let Some(admin_password) = &settings.admin_password {
        if constant_time_compare(password, admin_password) {
            return Some(UserRole::Admin);
        }
    }
    if constant_time_compare(password, &settings.global_user_password) {
        return Some(UserRole::User);
    }
    None
}

/// Validate the email, resolve the password to a role and persist the
/// resulting session.
pub fn login(
    cache: &CacheStore,
    settings: &AppSettings,
    email: &str,
    password: &str,
) -> Result<UserSession, AppError> {
    let email = email.trim().to_lowercase();
    let Some((local_part, domain)) = email.split_once('@') else {
        return Err(AppError::Validation(
            "المرجو إدخال بريد إلكتروني مهني صحيح".to_string(),
        ));
    };
    if local_part.is_empty() || !ALLOWED_DOMAINS.contains(&domain) {
        return Err(AppError::Validation(
            "المنصة مقتصرة على نطاق men.gov.ma أو taalim.ma".to_string(),
        ));
    }

    let role = resolve_role(settings, password)
        .ok_or_else(|| AppError::Unauthorized("كلمة المرور غير صحيحة".to_string()))?;

    let name = match role {
        UserRole::Admin => ADMIN_DISPLAY_NAME.to_string(),
        UserRole::User => local_part.to_string(),
    };
    let session = UserSession {
        email,
        role,
        name,
        image: None,
    };
    cache.set_as(keys::SESSION, &session)?;
    tracing::info!(email = %session.email, role = ?session.role, "Session opened");
    Ok(session)
}

/// The persisted session, if a user is signed in.
pub fn current_session(cache: &CacheStore) -> Option<UserSession> {
    cache.get_as(keys::SESSION)
}

/// Replace the persisted session, e.g. after a profile edit.
pub fn update_session(cache: &CacheStore, session: &UserSession) -> Result<(), AppError> {
    cache.set_as(keys::SESSION, session)
}

/// Drop the persisted session.
pub fn logout(cache: &CacheStore) {
    cache.remove(keys::SESSION);
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings() -> AppSettings {
        AppSettings {
            global_user_password: "staff-pass".to_string(),
            admin_password: Some("admin-pass".to_string()),
            ..AppSettings::default()
        }
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_resolve_role() {
        let settings = settings();
        assert_eq!(
            resolve_role(&settings, "admin-pass"),
            Some(UserRole::Admin)
        );
        assert_eq!(resolve_role(&settings, "staff-pass"), Some(UserRole::User));
        assert_eq!(resolve_role(&settings, "wrong"), None);
    }

    #[test]
    fn test_resolve_role_without_admin_password() {
        let mut settings = settings();
        settings.admin_password = None;
        assert_eq!(resolve_role(&settings, "admin-pass"), None);
        assert_eq!(resolve_role(&settings, "staff-pass"), Some(UserRole::User));
    }

    #[test]
    fn test_login_persists_session() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();

        let session = login(&cache, &settings(), "S.Alami@men.gov.ma", "staff-pass").unwrap();
        assert_eq!(session.email, "s.alami@men.gov.ma");
        assert_eq!(session.role, UserRole::User);
        assert_eq!(session.name, "s.alami");

        assert_eq!(current_session(&cache), Some(session));
        logout(&cache);
        assert!(current_session(&cache).is_none());
    }

    #[test]
    fn test_login_admin_name() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();

        let session = login(&cache, &settings(), "dir@men.gov.ma", "admin-pass").unwrap();
        assert_eq!(session.role, UserRole::Admin);
        assert_eq!(session.name, ADMIN_DISPLAY_NAME);
    }

    #[test]
    fn test_login_rejects_foreign_domain() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();

        let err = login(&cache, &settings(), "someone@gmail.com", "staff-pass").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(current_session(&cache).is_none());
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();

        let err = login(&cache, &settings(), "a@men.gov.ma", "nope").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(current_session(&cache).is_none());
    }
}
