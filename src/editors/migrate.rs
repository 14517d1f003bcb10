//! Load-time snapshot migrations.
//!
//! Stored snapshots evolve; instead of patching values inline at every read
//! site, each feature declares an ordered migration chain that rewrites the
//! raw JSON before deserialization. Migrations must be idempotent: cached
//! and remote snapshots pass through the chain on every load and sync.

use serde_json::Value;

use super::collection::Migration;

/// Cycle label written by registry snapshots older than v37.
const LEGACY_PRIMARY_CYCLE: &str = "التعليم الابتدائي";
const PRIMARY_CYCLE: &str = "الابتدائي";

/// Migration chain for the school registry snapshot.
pub static SCHOOL_REGISTRY: &[Migration] = &[rename_legacy_primary_cycle];

/// Rewrite the legacy primary-cycle label on every institution.
fn rename_legacy_primary_cycle(mut raw: Value) -> Value {
    if let Some(institutions) = raw.as_array_mut() {
        for institution in institutions {
            let cycle = institution.get_mut("cycle");
            if let Some(cycle) = cycle {
                if cycle.as_str() == Some(LEGACY_PRIMARY_CYCLE) {
                    *cycle = Value::String(PRIMARY_CYCLE.to_string());
                }
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_cycle_label_is_rewritten() {
        let raw = json!([
            {"id": "a", "cycle": "التعليم الابتدائي"},
            {"id": "b", "cycle": "الثانوي الإعدادي"}
        ]);
        let migrated = rename_legacy_primary_cycle(raw);
        assert_eq!(migrated[0]["cycle"], "الابتدائي");
        assert_eq!(migrated[1]["cycle"], "الثانوي الإعدادي");
    }

    #[test]
    fn test_migration_is_idempotent() {
        let raw = json!([{"id": "a", "cycle": "الابتدائي"}]);
        let once = rename_legacy_primary_cycle(raw.clone());
        let twice = rename_legacy_primary_cycle(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, raw);
    }

    #[test]
    fn test_non_array_snapshot_passes_through() {
        let raw = json!({"unexpected": true});
        assert_eq!(rename_legacy_primary_cycle(raw.clone()), raw);
    }
}
