//! Settings document model, merge engine, fragment producers and persistence.

/// Typed settings document and its JSON mapping.
pub mod document;
/// Fragment builders for installed items.
pub(crate) mod fragment;
/// Order-preserving, deduplicating merge of settings documents.
pub mod merge;
/// Settings file persistence.
pub mod store;

pub use self::{document::SettingsDocument, merge::merge};
