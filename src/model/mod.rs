//! Document model
//!
//! This module defines the CV document schema, the section entry sum type,
//! the template catalog, and the load-time healing of older records.

pub mod cv;
pub mod entry;
pub mod migrate;
pub mod templates;

pub use cv::*;
pub use entry::*;
pub use templates::{create_cv, template_by_id, templates, Template};
