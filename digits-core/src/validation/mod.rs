//! Validation utilities for IDX streams and bitmap comparisons
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;
pub mod format;

pub use bounds::{max_distance, pixel_payload_size, validate_same_shape};
pub use format::{validate_label_byte, validate_pixel_fill};
