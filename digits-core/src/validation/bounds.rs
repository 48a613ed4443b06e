//! Shape and size validation
//!
//! Pure arithmetic checks with no I/O dependencies.

use crate::bitmap::Shape;
use crate::error::{DigitsError, Result};
use crate::format::ImageHeader;

/// Both bitmaps must share a grid shape before they can be compared
pub const fn validate_same_shape(expected: Shape, found: Shape) -> Result<()> {
    if expected.rows != found.rows || expected.columns != found.columns {
        return Err(DigitsError::Shape { expected, found });
    }
    Ok(())
}

/// Total pixel payload of an image stream, with overflow protection
///
/// Returns `None` when `count * rows * columns` does not fit in `u64`,
/// which no real stream can satisfy.
pub const fn pixel_payload_size(header: &ImageHeader) -> Option<u64> {
    let record = (header.rows as u64).checked_mul(header.columns as u64);
    match record {
        Some(record) => record.checked_mul(header.count as u64),
        None => None,
    }
}

/// Largest squared distance two bitmaps of `shape` can have
///
/// Used to confirm that distance sums cannot overflow `u64`.
pub const fn max_distance(shape: Shape) -> Option<u64> {
    const MAX_SQUARED: u64 = 255 * 255;
    (shape.len() as u64).checked_mul(MAX_SQUARED)
}
