//! Opening dataset readers from files on disk
//!
//! [`open`] streams both files through buffered readers. [`open_mmap`]
//! maps them into memory first, which avoids read syscalls when the whole
//! dataset is going to be consumed anyway.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::{Mmap, MmapOptions};
#[cfg(feature = "mmap")]
use std::io::Cursor;

use super::{DatasetReader, ReaderOptions};
use crate::error::Result;

/// Reader over buffered files
pub type FileReader = DatasetReader<BufReader<File>, BufReader<File>>;

/// Reader over memory-mapped files
#[cfg(feature = "mmap")]
pub type MmapReader = DatasetReader<Cursor<Mmap>, Cursor<Mmap>>;

/// Open an image file and its label file
pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(images: P, labels: Q) -> Result<FileReader> {
    open_with_options(images, labels, ReaderOptions::default())
}

/// Like [`open`] with explicit reader options
pub fn open_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    images: P,
    labels: Q,
    options: ReaderOptions,
) -> Result<FileReader> {
    let images = BufReader::new(File::open(images)?);
    let labels = BufReader::new(File::open(labels)?);
    DatasetReader::with_options(images, labels, options)
}

/// Memory-map an image file and its label file
#[cfg(feature = "mmap")]
pub fn open_mmap<P: AsRef<Path>, Q: AsRef<Path>>(images: P, labels: Q) -> Result<MmapReader> {
    open_mmap_with_options(images, labels, ReaderOptions::default())
}

/// Like [`open_mmap`] with explicit reader options
#[cfg(feature = "mmap")]
pub fn open_mmap_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    images: P,
    labels: Q,
    options: ReaderOptions,
) -> Result<MmapReader> {
    let images = map_file(images.as_ref())?;
    let labels = map_file(labels.as_ref())?;
    DatasetReader::with_options(Cursor::new(images), Cursor::new(labels), options)
}

#[cfg(feature = "mmap")]
fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    // SAFETY: the mapping is read-only and owned by the reader; dataset files
    // are not expected to be modified while they are being decoded
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    Ok(mmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset_reader::tests::idx_pair;
    use crate::error::DatasetError;
    use digits_core::{FormatError, Label, Stream};
    use std::io::Write;

    fn write_pair(dir: &Path, images: &[u8], labels: &[u8]) -> (std::path::PathBuf, std::path::PathBuf) {
        let image_path = dir.join("images.idx3-ubyte");
        let label_path = dir.join("labels.idx1-ubyte");
        File::create(&image_path).unwrap().write_all(images).unwrap();
        File::create(&label_path).unwrap().write_all(labels).unwrap();
        (image_path, label_path)
    }

    #[test]
    fn test_open_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let (images, labels) = idx_pair(1, 3, &[(2, vec![1, 2, 3]), (9, vec![4, 5, 6])]);
        let (image_path, label_path) = write_pair(dir.path(), &images, &labels);

        let mut reader = open(&image_path, &label_path).unwrap();
        let bitmaps = reader.read_all().unwrap();
        assert_eq!(bitmaps.len(), 2);
        assert_eq!(bitmaps[1].label(), Label::Digit(9));
        assert_eq!(bitmaps[1].pixels(), &[4, 5, 6]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(dir.path().join("nope"), dir.path().join("nope")).err().unwrap();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn test_open_empty_label_file() {
        let dir = tempfile::tempdir().unwrap();
        let (images, _) = idx_pair(1, 1, &[(2, vec![1])]);
        let (image_path, label_path) = write_pair(dir.path(), &images, &[]);
        let err = open(&image_path, &label_path).err().unwrap();
        assert_eq!(
            err.format_error(),
            Some(FormatError::UnexpectedEnd(Stream::Labels))
        );
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn test_open_mmap_matches_buffered() {
        let dir = tempfile::tempdir().unwrap();
        let (images, labels) = idx_pair(2, 2, &[(1, vec![0, 0, 9, 9]), (5, vec![7, 7, 7, 7])]);
        let (image_path, label_path) = write_pair(dir.path(), &images, &labels);

        let buffered = open(&image_path, &label_path).unwrap().read_all().unwrap();
        let mapped = open_mmap(&image_path, &label_path).unwrap().read_all().unwrap();
        assert_eq!(buffered, mapped);
    }
}
