//! Load-time healing for older documents
//!
//! Missing newer fields are filled by serde defaults while decoding; this
//! pass normalizes records that decoded but carry degenerate values, so the
//! editor never sees a partially shaped document. Healing is not an error
//! path.

use crate::config::{MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};
use crate::model::cv::{default_separator_color, Cv};

/// Normalizes a freshly loaded document in place.
pub fn heal(cv: &mut Cv) {
    if cv.theme.separator_color.trim().is_empty() {
        cv.theme.separator_color = default_separator_color();
    }

    if !(1..=2).contains(&cv.layout.columns) {
        cv.layout.columns = 1;
    }

    if !cv.layout.split_ratio.is_finite()
        || cv.layout.split_ratio < MIN_SPLIT_RATIO
        || cv.layout.split_ratio > MAX_SPLIT_RATIO
    {
        cv.layout.split_ratio = cv
            .layout
            .split_ratio
            .clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
        if !cv.layout.split_ratio.is_finite() {
            cv.layout.split_ratio = 0.35;
        }
    }

    // Same bounds the mutation path enforces; out-of-range widths would
    // otherwise eat the whole page in sidebar layouts.
    cv.theme.accent_box.width = cv.theme.accent_box.width.clamp(15, 50);

    // Re-sequence section order to a dense 0..n permutation, preserving the
    // stored relative order.
    cv.sections.sort_by_key(|s| s.order);
    for (index, section) in cv.sections.iter_mut().enumerate() {
        section.order = index as u32;
    }
}
