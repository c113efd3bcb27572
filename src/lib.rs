//! cvstudio library
//!
//! The document-state core of a local-first CV builder: typed resume schema,
//! mutation store with autosave and bounded revision history, SQLite-backed
//! storage, and dual renderers (interactive preview, paginated A4 export).

pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod services;
pub mod storage;
