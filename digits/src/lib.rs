//! Digits - IDX digit dataset reader and nearest-neighbor classifier
//!
//! This library decodes paired IDX image/label files into labeled bitmaps
//! and classifies query bitmaps by weighted k-nearest-neighbor vote.
//!
//! ## Architecture
//!
//! - **digits-core**: format definitions, the bitmap entity, errors and the
//!   pure k-NN math (no I/O)
//! - **digits**: streaming readers over files and memory maps, a
//!   training-set-backed classifier with parallel distance evaluation, and
//!   accuracy evaluation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digits::{open, Classify, KnnClassifier, KnnConfig};
//!
//! fn example() -> digits::Result<()> {
//!     let training = open("train-images.idx3-ubyte", "train-labels.idx1-ubyte")?.read_all()?;
//!     let mut test = open("t10k-images.idx3-ubyte", "t10k-labels.idx1-ubyte")?;
//!
//!     let classifier = KnnClassifier::new(training, KnnConfig::with_k(5))?;
//!     if let Some(query) = test.read_one()? {
//!         println!("predicted {} (actual {})", classifier.classify(&query)?, query.label());
//!     }
//!     Ok(())
//! }
//! ```

// Re-export core abstractions and format definitions
pub use digits_core::{
    // Entities
    Bitmap, Label, Shape,
    // Capability
    Classify,
    // Format definitions
    ImageHeader, LabelHeader,
    // Error handling
    Axis, DigitsError, ErrorCategory, FormatError, Stream, ValueError,
    // Scoring
    classify, classify_with, distance, Neighbor, VotePolicy,
};

// Implementation modules
pub mod classifier;
pub mod dataset_reader;
pub mod error;
pub mod evaluation;

// Public exports
pub use classifier::{KnnClassifier, KnnConfig};
pub use dataset_reader::file_io::{open, open_with_options, FileReader};
pub use dataset_reader::{DatasetReader, ReaderOptions, Records};
pub use error::{DatasetError, Result};
pub use evaluation::{evaluate, evaluate_with_progress, Evaluation};

// Memory mapping features
#[cfg(feature = "mmap")]
pub use dataset_reader::file_io::{open_mmap, open_mmap_with_options, MmapReader};
