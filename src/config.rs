//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the engine.

// ===== Revision History =====

/// Maximum revisions kept per CV. Older snapshots are evicted silently.
pub const MAX_REVISIONS: usize = 10;

// ===== Autosave =====

/// Default quiet period before a debounced autosave fires, in milliseconds.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 3_000;

/// Minimum autosave debounce in milliseconds.
/// Values below this cause excessive disk I/O and degrade performance.
pub const MIN_AUTOSAVE_DEBOUNCE_MS: u64 = 100;

/// Maximum autosave debounce in milliseconds (5 minutes).
/// Values above this risk data loss on unexpected shutdown.
pub const MAX_AUTOSAVE_DEBOUNCE_MS: u64 = 300_000;

// ===== Layout Limits =====

/// Minimum left-column width fraction in two-column layouts.
pub const MIN_SPLIT_RATIO: f32 = 0.25;

/// Maximum left-column width fraction in two-column layouts.
pub const MAX_SPLIT_RATIO: f32 = 0.5;

// ===== Page Geometry =====

/// A4 page width in points (210 mm).
pub const A4_WIDTH_PT: f32 = 595.28;

/// A4 page height in points (297 mm).
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Export page margin on all four sides, in points.
pub const PAGE_MARGIN_PT: f32 = 40.0;

/// A4 width in CSS pixels at 96 dpi — the preview's unscaled base width.
pub const PREVIEW_BASE_WIDTH_PX: f32 = 794.0;

// ===== Export Artifact =====

/// File extension for the exported document artifact.
pub const EXPORT_EXTENSION: &str = "pdf";
