//! Record-by-record iteration over a dataset reader

use std::io::Read;
use std::iter::FusedIterator;

use digits_core::Bitmap;

use super::DatasetReader;
use crate::error::Result;

/// Lazy, forward-only iterator over the remaining records of a reader
///
/// Ends normally only when the declared record count is reached. A decoding
/// failure is yielded as `Some(Err(_))` and ends the iteration.
pub struct Records<'a, I, L> {
    reader: &'a mut DatasetReader<I, L>,
    finished: bool,
}

impl<'a, I: Read, L: Read> Records<'a, I, L> {
    pub(super) fn new(reader: &'a mut DatasetReader<I, L>) -> Self {
        Self {
            reader,
            finished: false,
        }
    }
}

impl<I: Read, L: Read> Iterator for Records<'_, I, L> {
    type Item = Result<Bitmap>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.reader.read_one() {
            Ok(Some(bitmap)) => Some(Ok(bitmap)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            // A failure may replace any remaining record, plus one for a poisoned reader
            (0, Some(self.reader.remaining().saturating_add(1)))
        }
    }
}

impl<I: Read, L: Read> FusedIterator for Records<'_, I, L> {}
