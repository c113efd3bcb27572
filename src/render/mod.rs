//! Rendering
//!
//! One shared layout plan feeds two painters: a scalable on-screen preview
//! and a fixed-page export. Both are pure functions of the document, so
//! they can be tested head to head.

pub mod export;
pub mod plan;
pub mod preview;
pub mod text;

pub use export::ExportDocument;
pub use plan::{plan, LayoutPlan};
pub use preview::PreviewDocument;
