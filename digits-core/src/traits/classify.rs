//! Classification capability
//!
//! Anything that can turn a bitmap into a predicted label implements
//! [`Classify`]. Drawing surfaces and batch drivers depend on this trait
//! only, never on how a particular classifier scores its inputs.

use crate::bitmap::{Bitmap, Label};
use crate::error::Result;

/// Predict the label of a bitmap
pub trait Classify {
    /// Return the predicted digit, or [`Label::Unknown`] when the
    /// classifier cannot commit to one.
    ///
    /// The input's own label is ignored.
    fn classify(&self, bitmap: &Bitmap) -> Result<Label>;
}

impl<C: Classify + ?Sized> Classify for &C {
    fn classify(&self, bitmap: &Bitmap) -> Result<Label> {
        (**self).classify(bitmap)
    }
}
