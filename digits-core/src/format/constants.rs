//! Format constants and magic numbers for IDX digit datasets

/// Magic number of an IDX image stream (unsigned byte, 3 dimensions)
pub const IMAGE_MAGIC: u32 = 2051;

/// Magic number of an IDX label stream (unsigned byte, 1 dimension)
pub const LABEL_MAGIC: u32 = 2049;

/// Size of the image stream header: magic, count, rows, columns
pub const IMAGE_HEADER_SIZE: usize = 16;

/// Size of the label stream header: magic, count
pub const LABEL_HEADER_SIZE: usize = 8;

/// Largest valid label byte
pub const MAX_LABEL: u8 = 9;

/// Number of distinct digit classes
pub const DIGIT_COUNT: usize = 10;

/// Default binarization threshold; intensities at or above it count as black
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Default number of records between progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Intensity of a blank cell
pub const WHITE: u8 = 0;

/// Intensity of a fully inked cell
pub const BLACK: u8 = 255;
