//! Staff directory models: a Department → Office → Employee tree.

use serde::{Deserialize, Serialize};

/// Presence status shown next to an employee in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Online,
    Offline,
    Away,
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Online
    }
}

/// An employee of the directorate.
///
/// `department` and `office` are denormalized copies of the owning container
/// names taken at creation time. Renaming a container does not rewrite them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
    pub office: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Fields supplied when creating an employee; the editor fills in the id,
/// the denormalized container names and the default status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// An office within a department, owning an ordered employee list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// A department of the directorate, owning an ordered office list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub offices: Vec<Office>,
}

/// A row in the read-only recipient directory exposed to other features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
}
