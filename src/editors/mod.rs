//! Domain editors.
//!
//! One editor per feature, each owning the in-memory working copy of its
//! collection and sharing the same lifecycle: synchronous cache load with a
//! seed fallback, whole-collection replacement on every mutation, manual
//! pull-to-sync for heavy collections and live subscriptions for the
//! lightweight singletons.

mod archive;
mod collection;
mod feed;
mod mail;
mod migrate;
mod registry;
mod settings;
mod staff;

pub use archive::{FormDraft, FormsEditor, MemoDraft, MemoEditor};
pub use feed::{AnnouncementDraft, FeedEditor};
pub use mail::MailEditor;
pub use registry::{InstitutionDraft, RegistryEditor, RegistryFilter, COMMUNES};
pub use settings::{SettingsEditor, TickerEditor, DEFAULT_TICKER};
pub use staff::StaffEditor;
