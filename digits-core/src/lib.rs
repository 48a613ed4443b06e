#![cfg_attr(not(test), no_std)]

//! Digits Core - IDX digit dataset format definitions and nearest-neighbor math
//!
//! This crate provides the bitmap entity, the IDX header layout, the error
//! taxonomy and the pure k-nearest-neighbor scoring used by the `digits`
//! crate. It performs no I/O.

extern crate alloc;

pub mod bitmap;
pub mod error;
pub mod format;
pub mod knn;
pub mod traits;
pub mod validation;

pub use bitmap::{Bitmap, Label, Shape};
pub use error::{Axis, DigitsError, ErrorCategory, FormatError, Result, Stream, ValueError};
pub use format::{ImageHeader, LabelHeader};
pub use knn::{classify, classify_with, distance, Neighbor, VotePolicy};
pub use traits::Classify;
