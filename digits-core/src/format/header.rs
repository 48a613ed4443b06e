//! IDX header format definitions
//!
//! Both streams start with a big-endian header. The image header is
//! followed by `count * rows * columns` pixel bytes, the label header by
//! `count` label bytes.

use super::constants::{IMAGE_HEADER_SIZE, IMAGE_MAGIC, LABEL_HEADER_SIZE, LABEL_MAGIC};
use crate::bitmap::Shape;
use crate::error::{Axis, FormatError, Stream};

/// Header of an IDX image stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageHeader {
    /// Magic number: 2051
    pub magic: u32,
    /// Number of records in the stream
    pub count: u32,
    /// Rows per record
    pub rows: u32,
    /// Columns per record
    pub columns: u32,
}

impl ImageHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = IMAGE_HEADER_SIZE;

    /// Create a header for `count` records of `rows` x `columns`
    pub const fn new(count: u32, rows: u32, columns: u32) -> Self {
        Self {
            magic: IMAGE_MAGIC,
            count,
            rows,
            columns,
        }
    }

    /// Check magic, count and dimensions in that order
    pub const fn validate(&self) -> Result<(), FormatError> {
        if self.magic != IMAGE_MAGIC {
            return Err(FormatError::BadMagic {
                stream: Stream::Images,
                found: self.magic,
            });
        }
        if self.count == 0 {
            return Err(FormatError::InvalidCount {
                stream: Stream::Images,
                found: self.count,
            });
        }
        if self.rows == 0 {
            return Err(FormatError::InvalidDimension {
                axis: Axis::Rows,
                found: self.rows,
            });
        }
        if self.columns == 0 {
            return Err(FormatError::InvalidDimension {
                axis: Axis::Columns,
                found: self.columns,
            });
        }
        Ok(())
    }

    /// Parse and validate a header from the first 16 bytes of an image stream
    pub const fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::UnexpectedEnd(Stream::Images));
        }

        let header = Self {
            magic: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            count: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            rows: u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            columns: u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        };

        match header.validate() {
            Ok(()) => Ok(header),
            Err(err) => Err(err),
        }
    }

    /// Convert header to bytes
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let fields = [self.magic, self.count, self.rows, self.columns];

        let mut i = 0;
        while i < fields.len() {
            let be = fields[i].to_be_bytes();
            bytes[i * 4] = be[0];
            bytes[i * 4 + 1] = be[1];
            bytes[i * 4 + 2] = be[2];
            bytes[i * 4 + 3] = be[3];
            i += 1;
        }

        bytes
    }

    /// Grid shape of every record in the stream
    pub const fn shape(&self) -> Shape {
        Shape::new(self.rows as usize, self.columns as usize)
    }

    /// Number of pixel bytes per record
    pub const fn record_size(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

/// Header of an IDX label stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelHeader {
    /// Magic number: 2049
    pub magic: u32,
    /// Number of labels in the stream
    pub count: u32,
}

impl LabelHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = LABEL_HEADER_SIZE;

    pub const fn new(count: u32) -> Self {
        Self {
            magic: LABEL_MAGIC,
            count,
        }
    }

    /// Parse a header from the first 8 bytes of a label stream
    ///
    /// Only the magic is checked here; the count can only be judged against
    /// the paired image header, see [`LabelHeader::validate_against`].
    pub const fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::UnexpectedEnd(Stream::Labels));
        }

        let magic = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != LABEL_MAGIC {
            return Err(FormatError::BadMagic {
                stream: Stream::Labels,
                found: magic,
            });
        }

        let count = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self { magic, count })
    }

    /// There must be at least one label per image
    pub const fn validate_against(&self, images: &ImageHeader) -> Result<(), FormatError> {
        if self.count < images.count {
            return Err(FormatError::InvalidCount {
                stream: Stream::Labels,
                found: self.count,
            });
        }
        Ok(())
    }

    /// Convert header to bytes
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        let magic = self.magic.to_be_bytes();
        let count = self.count.to_be_bytes();
        [
            magic[0], magic[1], magic[2], magic[3], count[0], count[1], count[2], count[3],
        ]
    }
}
