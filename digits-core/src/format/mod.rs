//! Binary format definitions for IDX digit datasets
//!
//! This module contains pure data structure definitions for the paired
//! image/label wire format. No I/O operations - only format definitions.

pub mod constants;
pub mod header;

pub use header::{ImageHeader, LabelHeader};
