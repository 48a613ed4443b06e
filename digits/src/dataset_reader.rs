//! Streaming reader for paired IDX image/label files
//!
//! The reader validates both headers up front and then decodes one record
//! at a time. A record that fails to decode poisons the reader: the error is
//! reported once and later reads refuse to continue past it.

use std::io::{ErrorKind, Read};

use digits_core::format::constants::DEFAULT_PROGRESS_INTERVAL;
use digits_core::validation::{pixel_payload_size, validate_label_byte, validate_pixel_fill};
use digits_core::{Bitmap, FormatError, ImageHeader, LabelHeader, Shape, Stream};
use log::{debug, info};

use crate::error::{DatasetError, Result};

pub mod file_io;
pub mod records;

pub use records::Records;

/// Upper bound on buffers sized from header fields before any data is seen
const PREALLOCATE_RECORDS: usize = 1024;
const PREALLOCATE_PIXELS: usize = 64 * 1024;

/// Configuration for dataset reading
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Records between progress log lines while tracing
    pub progress_interval: usize,
    /// Emit progress log lines from `read_many`
    pub tracing: bool,
}

impl ReaderOptions {
    /// Set the number of records between progress lines (0 disables them)
    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Enable or disable progress logging
    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = tracing;
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            tracing: false,
        }
    }
}

/// Decodes an image stream and its label stream into [`Bitmap`]s
pub struct DatasetReader<I, L> {
    images: I,
    labels: L,
    header: ImageHeader,
    label_header: LabelHeader,
    current: u32,
    failed_at: Option<u32>,
    options: ReaderOptions,
}

impl<I: Read, L: Read> DatasetReader<I, L> {
    /// Validate both headers and position the reader at the first record
    pub fn new(images: I, labels: L) -> Result<Self> {
        Self::with_options(images, labels, ReaderOptions::default())
    }

    /// Like [`DatasetReader::new`] with explicit options
    pub fn with_options(mut images: I, mut labels: L, options: ReaderOptions) -> Result<Self> {
        let mut image_bytes = [0u8; ImageHeader::SIZE];
        read_exact_or(&mut images, &mut image_bytes, FormatError::UnexpectedEnd(Stream::Images))?;
        let header = ImageHeader::from_bytes(&image_bytes)?;

        let mut label_bytes = [0u8; LabelHeader::SIZE];
        read_exact_or(&mut labels, &mut label_bytes, FormatError::UnexpectedEnd(Stream::Labels))?;
        let label_header = LabelHeader::from_bytes(&label_bytes)?;
        label_header.validate_against(&header)?;

        debug!(
            "Opened dataset: {} records of {}x{} ({} labels, {:?} pixel bytes)",
            header.count,
            header.rows,
            header.columns,
            label_header.count,
            pixel_payload_size(&header)
        );

        Ok(Self {
            images,
            labels,
            header,
            label_header,
            current: 0,
            failed_at: None,
            options,
        })
    }

    /// Turn progress logging on or off
    pub fn set_tracing(&mut self, tracing: bool) {
        self.options.tracing = tracing;
    }

    /// Builder form of [`DatasetReader::set_tracing`]
    pub fn with_tracing(mut self) -> Self {
        self.options.tracing = true;
        self
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub fn label_header(&self) -> &LabelHeader {
        &self.label_header
    }

    pub fn rows(&self) -> usize {
        self.header.rows as usize
    }

    pub fn columns(&self) -> usize {
        self.header.columns as usize
    }

    pub fn shape(&self) -> Shape {
        self.header.shape()
    }

    /// Declared number of records
    pub fn count(&self) -> usize {
        self.header.count as usize
    }

    /// Number of records consumed so far
    pub fn current(&self) -> usize {
        self.current as usize
    }

    /// Records not yet consumed
    pub fn remaining(&self) -> usize {
        (self.header.count - self.current) as usize
    }

    /// Decode the next record
    ///
    /// Returns `Ok(None)` once every declared record has been read. A
    /// decoding failure is returned once; every later call returns
    /// [`DatasetError::Poisoned`].
    pub fn read_one(&mut self) -> Result<Option<Bitmap>> {
        if let Some(record) = self.failed_at {
            return Err(DatasetError::Poisoned { record });
        }
        if self.remaining() == 0 {
            return Ok(None);
        }

        let record = self.current;
        self.current += 1;
        match self.decode(record) {
            Ok(bitmap) => Ok(Some(bitmap)),
            Err(err) => {
                self.failed_at = Some(record);
                Err(err)
            }
        }
    }

    /// Decode up to `count` records, fewer if the dataset runs out
    pub fn read_many(&mut self, count: usize) -> Result<Vec<Bitmap>> {
        let count = count.min(self.remaining());
        let mut bitmaps = Vec::with_capacity(count.min(PREALLOCATE_RECORDS));

        for i in 0..count {
            if self.options.tracing
                && self.options.progress_interval > 0
                && i % self.options.progress_interval == 0
            {
                info!("Reading image: {}", self.current + 1);
            }
            match self.read_one()? {
                Some(bitmap) => bitmaps.push(bitmap),
                None => break,
            }
        }

        Ok(bitmaps)
    }

    /// Decode every remaining record
    pub fn read_all(&mut self) -> Result<Vec<Bitmap>> {
        self.read_many(self.remaining())
    }

    /// Lazily iterate over the remaining records
    pub fn records(&mut self) -> Records<'_, I, L> {
        Records::new(self)
    }

    fn decode(&mut self, record: u32) -> Result<Bitmap> {
        let mut label = [0u8; 1];
        read_exact_or(&mut self.labels, &mut label, FormatError::UnexpectedEnd(Stream::Labels))?;
        let label = validate_label_byte(record, label[0])?;

        let expected = self.header.record_size();
        let mut pixels = Vec::with_capacity(expected.min(PREALLOCATE_PIXELS));
        (&mut self.images).take(expected as u64).read_to_end(&mut pixels)?;
        validate_pixel_fill(record, pixels.len(), expected)?;

        Ok(Bitmap::from_pixels(self.rows(), self.columns(), pixels, label)?)
    }
}

impl<'a, I: Read, L: Read> IntoIterator for &'a mut DatasetReader<I, L> {
    type Item = Result<Bitmap>;
    type IntoIter = Records<'a, I, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}

/// `read_exact`, reporting a premature end as a format violation
fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], on_eof: FormatError) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => DatasetError::from(on_eof),
        _ => DatasetError::Io(err),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use digits_core::{Axis, Label};
    use std::io::Cursor;

    /// Serialize records into an (images, labels) stream pair
    pub(crate) fn idx_pair(rows: u32, columns: u32, records: &[(u8, Vec<u8>)]) -> (Vec<u8>, Vec<u8>) {
        let mut images = ImageHeader::new(records.len() as u32, rows, columns)
            .to_bytes()
            .to_vec();
        let mut labels = LabelHeader::new(records.len() as u32).to_bytes().to_vec();
        for (label, pixels) in records {
            labels.push(*label);
            images.extend_from_slice(pixels);
        }
        (images, labels)
    }

    fn reader(images: Vec<u8>, labels: Vec<u8>) -> Result<DatasetReader<Cursor<Vec<u8>>, Cursor<Vec<u8>>>> {
        DatasetReader::new(Cursor::new(images), Cursor::new(labels))
    }

    fn sample() -> (Vec<u8>, Vec<u8>) {
        idx_pair(
            2,
            2,
            &[
                (3, vec![0, 1, 2, 3]),
                (7, vec![255, 254, 253, 252]),
                (0, vec![9, 9, 9, 9]),
            ],
        )
    }

    #[test]
    fn test_reads_every_record_then_stops() {
        let (images, labels) = sample();
        let mut reader = reader(images, labels).unwrap();
        assert_eq!(reader.count(), 3);
        assert_eq!(reader.shape(), Shape::new(2, 2));

        let first = reader.read_one().unwrap().unwrap();
        assert_eq!(first.label(), Label::Digit(3));
        assert_eq!(first.pixels(), &[0, 1, 2, 3]);
        assert_eq!(reader.current(), 1);
        assert_eq!(reader.remaining(), 2);

        let rest = reader.read_all().unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].get(1, 1), 252);
        assert_eq!(rest[1].label(), Label::Digit(0));

        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_one().unwrap().is_none());
        assert!(reader.read_many(5).unwrap().is_empty());
    }

    #[test]
    fn test_read_many_is_capped() {
        let (images, labels) = sample();
        let mut reader = reader(images, labels).unwrap().with_tracing();
        assert_eq!(reader.read_many(2).unwrap().len(), 2);
        assert_eq!(reader.read_many(10).unwrap().len(), 1);
    }

    #[test]
    fn test_iteration_yields_declared_count() {
        let (images, labels) = sample();
        let mut reader = reader(images, labels).unwrap();
        let bitmaps: Vec<Bitmap> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(bitmaps.len(), 3);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.records().count(), 0);
    }

    #[test]
    fn test_bad_image_magic() {
        let (mut images, labels) = sample();
        images[3] = 0x01; // 2049
        let err = reader(images, labels).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::BadMagic {
                stream: Stream::Images,
                found: 2049
            })
        );
    }

    #[test]
    fn test_bad_label_magic() {
        let (images, mut labels) = sample();
        labels[3] = 0x03;
        let err = reader(images, labels).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::BadMagic {
                stream: Stream::Labels,
                found: 2051
            })
        );
    }

    #[test]
    fn test_zero_dimension() {
        let images = ImageHeader::new(1, 0, 4).to_bytes().to_vec();
        let labels = LabelHeader::new(1).to_bytes().to_vec();
        let err = reader(images, labels).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::InvalidDimension {
                axis: Axis::Rows,
                found: 0
            })
        );
    }

    #[test]
    fn test_too_few_labels() {
        let (images, _) = sample();
        let mut labels = LabelHeader::new(2).to_bytes().to_vec();
        labels.extend_from_slice(&[3, 7]);
        let err = reader(images, labels).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::InvalidCount {
                stream: Stream::Labels,
                found: 2
            })
        );
    }

    #[test]
    fn test_extra_labels_are_fine() {
        let (images, mut labels) = sample();
        labels[7] = 5; // declare five labels
        labels.extend_from_slice(&[1, 2]);
        let mut reader = reader(images, labels).unwrap();
        assert_eq!(reader.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_truncated_headers() {
        let err = reader(vec![0, 0, 8], vec![]).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::UnexpectedEnd(Stream::Images))
        );

        let (images, _) = sample();
        let err = reader(images, vec![0, 0, 8, 1]).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::UnexpectedEnd(Stream::Labels))
        );
    }

    #[test]
    fn test_invalid_label_byte() {
        let (images, labels) = idx_pair(1, 2, &[(4, vec![1, 2]), (10, vec![3, 4])]);
        let mut reader = reader(images, labels).unwrap();
        assert!(reader.read_one().unwrap().is_some());
        let err = reader.read_one().unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(FormatError::InvalidLabel {
                record: 1,
                found: 10
            })
        );
    }

    #[test]
    fn test_truncated_pixels_poison_the_reader() {
        let (mut images, labels) = sample();
        images.truncate(ImageHeader::SIZE + 4 + 3); // second record is one byte short
        let mut reader = reader(images, labels).unwrap();

        assert!(reader.read_one().unwrap().is_some());
        let err = reader.read_one().unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(FormatError::InvalidPixel {
                record: 1,
                offset: 3
            })
        );
        assert!(matches!(
            reader.read_one(),
            Err(DatasetError::Poisoned { record: 1 })
        ));
    }

    #[test]
    fn test_iteration_surfaces_failure_once() {
        let (mut images, labels) = sample();
        images.truncate(ImageHeader::SIZE + 4);
        let mut reader = reader(images, labels).unwrap();

        let items: Vec<Result<Bitmap>> = reader.records().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(
            items[1].as_ref().unwrap_err().format_error(),
            Some(FormatError::InvalidPixel {
                record: 1,
                offset: 0
            })
        );
    }

    #[test]
    fn test_truncated_labels() {
        let (images, mut labels) = sample();
        labels.truncate(LabelHeader::SIZE + 1);
        let mut reader = reader(images, labels).unwrap();
        assert!(reader.read_one().unwrap().is_some());
        let err = reader.read_one().unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(FormatError::UnexpectedEnd(Stream::Labels))
        );
    }

    #[test]
    fn test_huge_declared_count_without_data() {
        let images = ImageHeader::new(u32::MAX, 28, 28).to_bytes().to_vec();
        let labels = LabelHeader::new(u32::MAX).to_bytes().to_vec();
        let mut reader = reader(images, labels).unwrap();
        assert_eq!(reader.remaining(), u32::MAX as usize);

        let err = reader.read_all().unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(FormatError::UnexpectedEnd(Stream::Labels))
        );
    }

    #[test]
    fn test_huge_declared_shape_without_pixels() {
        let images = ImageHeader::new(1, u32::MAX, u32::MAX).to_bytes().to_vec();
        let mut labels = LabelHeader::new(1).to_bytes().to_vec();
        labels.push(4);
        labels.extend_from_slice(&[1, 2, 3]);
        let mut reader = reader(images, labels).unwrap();

        let err = reader.read_one().unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(FormatError::InvalidPixel {
                record: 0,
                offset: 0
            })
        );
    }
}
