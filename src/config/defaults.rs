// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the gallery. Constants are organized by category.
//!
//! # Categories
//!
//! - **Viewport**: Near-visible margin and playback threshold
//! - **Scan**: Batch size of discovered files

// ==========================================================================
// Viewport Defaults
// ==========================================================================

/// Distance from the viewport (in pixels) under which a surface counts as
/// near-visible and its content is materialized.
pub const DEFAULT_PROXIMITY_MARGIN_PX: f32 = 200.0;

/// Minimum proximity margin.
pub const MIN_PROXIMITY_MARGIN_PX: f32 = 0.0;

/// Maximum proximity margin.
pub const MAX_PROXIMITY_MARGIN_PX: f32 = 2000.0;

/// Visible fraction of a video surface at which playback starts (0.0 to 1.0).
pub const DEFAULT_PLAYBACK_THRESHOLD: f32 = 0.5;

/// Minimum playback threshold.
pub const MIN_PLAYBACK_THRESHOLD: f32 = 0.0;

/// Maximum playback threshold.
pub const MAX_PLAYBACK_THRESHOLD: f32 = 1.0;

// ==========================================================================
// Scan Defaults
// ==========================================================================

/// Number of descriptors per scan batch.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 64;

/// Minimum scan batch size.
pub const MIN_SCAN_BATCH_SIZE: usize = 1;

/// Maximum scan batch size.
pub const MAX_SCAN_BATCH_SIZE: usize = 4096;

/// Batches buffered between the scanner thread and the consumer.
pub const SCAN_CHANNEL_CAPACITY: usize = 8;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Viewport validation
    assert!(MIN_PROXIMITY_MARGIN_PX >= 0.0);
    assert!(MAX_PROXIMITY_MARGIN_PX > MIN_PROXIMITY_MARGIN_PX);
    assert!(DEFAULT_PROXIMITY_MARGIN_PX >= MIN_PROXIMITY_MARGIN_PX);
    assert!(DEFAULT_PROXIMITY_MARGIN_PX <= MAX_PROXIMITY_MARGIN_PX);
    assert!(DEFAULT_PLAYBACK_THRESHOLD >= MIN_PLAYBACK_THRESHOLD);
    assert!(DEFAULT_PLAYBACK_THRESHOLD <= MAX_PLAYBACK_THRESHOLD);

    // Scan validation
    assert!(MIN_SCAN_BATCH_SIZE > 0);
    assert!(MAX_SCAN_BATCH_SIZE >= MIN_SCAN_BATCH_SIZE);
    assert!(DEFAULT_SCAN_BATCH_SIZE >= MIN_SCAN_BATCH_SIZE);
    assert!(DEFAULT_SCAN_BATCH_SIZE <= MAX_SCAN_BATCH_SIZE);
    assert!(SCAN_CHANNEL_CAPACITY > 0);
};
