//! Services module
//!
//! Stores and background logic that coordinate between the UI and storage.

pub mod autosave;
pub mod dashboard;
pub mod document;

pub use autosave::Autosave;
pub use dashboard::DashboardStore;
pub use document::DocumentStore;
