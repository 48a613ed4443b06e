//! Error types for digit dataset and classification operations

use crate::bitmap::Shape;

/// Which half of a paired dataset a format error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// The image (pixel) stream
    Images,
    /// The label stream
    Labels,
}

impl core::fmt::Display for Stream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Stream::Images => write!(f, "images"),
            Stream::Labels => write!(f, "labels"),
        }
    }
}

/// Bitmap axis named by a dimension error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Rows,
    Columns,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Axis::Rows => write!(f, "row"),
            Axis::Columns => write!(f, "column"),
        }
    }
}

/// Structural violations found while decoding an IDX stream pair
///
/// Every variant is fatal for the reader that produced it and carries the
/// offending raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Header magic does not match the stream kind
    BadMagic { stream: Stream, found: u32 },
    /// Record count is zero (images) or smaller than the image count (labels)
    InvalidCount { stream: Stream, found: u32 },
    /// Row or column size is zero
    InvalidDimension { axis: Axis, found: u32 },
    /// Label byte outside 0..=9
    InvalidLabel { record: u32, found: u8 },
    /// Pixel data ended before the record was complete
    InvalidPixel { record: u32, offset: u32 },
    /// Stream ended inside a header or before a label byte
    UnexpectedEnd(Stream),
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FormatError::BadMagic { stream, found } => {
                write!(f, "Bad magic ({stream}): {found}")
            }
            FormatError::InvalidCount { stream, found } => {
                write!(f, "Invalid {stream} count: {found}")
            }
            FormatError::InvalidDimension { axis, found } => {
                write!(f, "Invalid {axis} size: {found}")
            }
            FormatError::InvalidLabel { record, found } => {
                write!(f, "Invalid label in record {record}: {found}")
            }
            FormatError::InvalidPixel { record, offset } => {
                write!(f, "Invalid pixel in record {record}: stream ended at offset {offset}")
            }
            FormatError::UnexpectedEnd(stream) => {
                write!(f, "Unexpected end of {stream} stream")
            }
        }
    }
}

/// Out-of-range values supplied to bitmap and label constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    /// Intensity outside 0..=255
    Pixel(i32),
    /// Label outside -1..=9
    Label(i8),
    /// Coordinate outside the grid
    Coordinate { row: usize, column: usize },
    /// Zero rows or zero columns
    Dimension,
    /// Pixel buffer length does not match rows * columns
    PixelCount { expected: usize, found: usize },
}

impl core::fmt::Display for ValueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValueError::Pixel(value) => write!(f, "Pixel: {value}"),
            ValueError::Label(value) => write!(f, "Digit: {value}"),
            ValueError::Coordinate { row, column } => {
                write!(f, "Coordinate out of bounds: ({row}, {column})")
            }
            ValueError::Dimension => write!(f, "Rows and columns must be positive"),
            ValueError::PixelCount { expected, found } => {
                write!(f, "Expected {expected} pixels, found {found}")
            }
        }
    }
}

/// Errors that can occur during dataset decoding or classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitsError {
    /// Malformed dataset stream
    Format(FormatError),
    /// Bitmaps with differing dimensions were compared
    Shape { expected: Shape, found: Shape },
    /// Empty training set, zero neighbor count, or similar caller mistake
    InvalidArgument(&'static str),
    /// Out-of-range pixel, label, or coordinate
    Value(ValueError),
}

impl core::fmt::Display for DigitsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DigitsError::Format(err) => write!(f, "{err}"),
            DigitsError::Shape { expected, found } => {
                write!(f, "Shape mismatch: expected {expected}, found {found}")
            }
            DigitsError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            DigitsError::Value(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for FormatError {}

impl core::error::Error for ValueError {}

impl core::error::Error for DigitsError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DigitsError::Format(err) => Some(err),
            DigitsError::Value(err) => Some(err),
            DigitsError::Shape { .. } | DigitsError::InvalidArgument(_) => None,
        }
    }
}

impl From<FormatError> for DigitsError {
    fn from(err: FormatError) -> Self {
        DigitsError::Format(err)
    }
}

impl From<ValueError> for DigitsError {
    fn from(err: ValueError) -> Self {
        DigitsError::Value(err)
    }
}

/// Broad classification of errors for callers deciding how to report them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input file is malformed
    Format,
    /// The caller passed inconsistent arguments
    Caller,
    /// A value was outside its permitted range
    Value,
}

impl DigitsError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            DigitsError::Format(_) => ErrorCategory::Format,
            DigitsError::Shape { .. } | DigitsError::InvalidArgument(_) => ErrorCategory::Caller,
            DigitsError::Value(_) => ErrorCategory::Value,
        }
    }

    /// None of these conditions clear up by retrying the same call.
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

/// Result type for digit operations
pub type Result<T> = core::result::Result<T, DigitsError>;
