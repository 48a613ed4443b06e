//! Record-level validation for IDX streams
//!
//! Pure functions applied to each decoded record; the reader supplies the
//! bytes, these decide whether they are acceptable.

use crate::bitmap::Label;
use crate::error::FormatError;
use crate::format::constants::MAX_LABEL;

/// Decode one label byte of record `record`
pub const fn validate_label_byte(record: u32, byte: u8) -> Result<Label, FormatError> {
    if byte > MAX_LABEL {
        return Err(FormatError::InvalidLabel {
            record,
            found: byte,
        });
    }
    Ok(Label::Digit(byte))
}

/// Check that a pixel read filled the whole record
///
/// `filled` is the number of bytes actually obtained before the stream
/// ended. Anything short of `expected` is corruption, never padding.
pub const fn validate_pixel_fill(record: u32, filled: usize, expected: usize) -> Result<(), FormatError> {
    if filled < expected {
        return Err(FormatError::InvalidPixel {
            record,
            offset: filled as u32,
        });
    }
    Ok(())
}
