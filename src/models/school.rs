//! Institution registry models.

use serde::{Deserialize, Serialize};

use super::Employee;

/// Teaching cycle of an institution. Serialized with the localized labels
/// stored by existing snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchoolCycle {
    #[serde(rename = "الابتدائي")]
    Primary,
    #[serde(rename = "الثانوي الإعدادي")]
    Preparatory,
    #[serde(rename = "الثانوي التأهيلي")]
    Secondary,
}

impl SchoolCycle {
    /// Localized display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            SchoolCycle::Primary => "الابتدائي",
            SchoolCycle::Preparatory => "الثانوي الإعدادي",
            SchoolCycle::Secondary => "الثانوي التأهيلي",
        }
    }

    /// Match a free-text cycle cell from an imported sheet. Substring match,
    /// falling back to primary, mirroring how imports classified cycles
    /// before this field was an enum.
    pub fn from_import_cell(cell: &str) -> SchoolCycle {
        if cell.contains("إعدادي") {
            SchoolCycle::Preparatory
        } else if cell.contains("تأهيلي") {
            SchoolCycle::Secondary
        } else {
            SchoolCycle::Primary
        }
    }
}

/// A satellite unit of a school group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubUnit {
    pub id: String,
    pub name: String,
    pub gresa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<Vec<Employee>>,
}

/// A school or school group in the registry.
///
/// Invariant enforced by the registry editor: `sub_units` is present only
/// when `is_group` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub gresa: String,
    pub cycle: SchoolCycle,
    pub commune: String,
    #[serde(default)]
    pub principal: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_units: Option<Vec<SubUnit>>,
    /// Central staff of a group institution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<Vec<Employee>>,
}

impl Institution {
    /// Whether this institution is a school group.
    pub fn is_group(&self) -> bool {
        self.is_group.unwrap_or(false)
    }
}
