//! Accuracy measurement against a labeled test set

use digits_core::format::constants::DEFAULT_PROGRESS_INTERVAL;
use digits_core::{Bitmap, Classify, DigitsError, Label};
use log::info;

/// Outcome of classifying a labeled test set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Evaluation {
    /// Records classified
    pub total: usize,
    /// Predictions that differ from the record label, unknown included
    pub errors: usize,
    /// Predictions that came back unknown
    pub unknown: usize,
}

impl Evaluation {
    /// Percentage of correct predictions
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 - (self.errors as f64 / self.total as f64) * 100.0
    }

    pub fn correct(&self) -> usize {
        self.total - self.errors
    }
}

/// Classify every test bitmap and count mistakes
pub fn evaluate<C: Classify + ?Sized>(classifier: &C, test: &[Bitmap]) -> Result<Evaluation, DigitsError> {
    evaluate_with_progress(classifier, test, DEFAULT_PROGRESS_INTERVAL)
}

/// Like [`evaluate`], logging a progress line every `interval` records
///
/// An `interval` of zero disables progress lines.
pub fn evaluate_with_progress<C: Classify + ?Sized>(
    classifier: &C,
    test: &[Bitmap],
    interval: usize,
) -> Result<Evaluation, DigitsError> {
    let mut evaluation = Evaluation::default();

    for (i, bitmap) in test.iter().enumerate() {
        if !bitmap.label().is_known() {
            return Err(DigitsError::InvalidArgument("test records must be labeled"));
        }
        if interval > 0 && i % interval == 0 {
            info!("{i} {} errors", evaluation.errors);
        }

        let predicted = classifier.classify(bitmap)?;
        evaluation.total += 1;
        if predicted == Label::Unknown {
            evaluation.unknown += 1;
        }
        if predicted != bitmap.label() {
            evaluation.errors += 1;
        }
    }

    Ok(evaluation)
}
