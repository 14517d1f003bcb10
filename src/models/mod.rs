//! Data models for the portal.
//!
//! Field names serialize in camelCase to stay wire-compatible with the
//! snapshots already stored by deployed clients.

mod mail;
mod records;
mod school;
mod settings;
mod staff;

pub use mail::*;
pub use records::*;
pub use school::*;
pub use settings::*;
pub use staff::*;

use uuid::Uuid;

/// Generate a collision-resistant record id with a feature prefix,
/// e.g. `emp-6f9a…`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_prefix_and_uniqueness() {
        let a = new_id("emp");
        let b = new_id("emp");
        assert!(a.starts_with("emp-"));
        assert_ne!(a, b);
    }
}
