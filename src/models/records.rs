//! Flat archive records: memos, downloadable forms and announcements.

use serde::{Deserialize, Serialize};

/// Category of an official memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoCategory {
    #[serde(rename = "وزارية")]
    Ministerial,
    #[serde(rename = "أكاديمية")]
    Academic,
    #[serde(rename = "إقليمية")]
    Regional,
    #[serde(rename = "نماذج")]
    Forms,
}

/// An official memo in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: String,
    pub title: String,
    pub reference: String,
    pub date: String,
    pub category: MemoCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// A downloadable administrative form. `file_data` carries an opaque
/// data-URI string when the form has an attached file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminForm {
    pub id: String,
    pub title: String,
    pub category: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A news-feed announcement. New announcements are prepended so the newest
/// appears first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
