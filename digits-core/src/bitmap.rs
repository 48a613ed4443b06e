//! Labeled intensity grids
//!
//! A [`Bitmap`] is a fixed-size grid of 8-bit intensities (0 = white,
//! 255 = black) plus a [`Label`] saying which digit it shows, if known.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::ValueError;
use crate::format::constants::{BLACK, DEFAULT_THRESHOLD, MAX_LABEL, WHITE};

/// Grid dimensions of a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Number of cells in the grid
    pub const fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Digit label of a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    /// A digit in 0..=9
    Digit(u8),
    /// Unlabeled input, or a classification without a confident answer
    #[default]
    Unknown,
}

impl Label {
    /// Wire value of an unknown label
    pub const UNKNOWN: i8 = -1;

    /// Create a digit label, rejecting values above 9
    pub const fn digit(value: u8) -> Result<Self, ValueError> {
        if value > MAX_LABEL {
            // value > 9 fits in i8 only up to 127; saturate for the report
            let reported = if value > i8::MAX as u8 { i8::MAX } else { value as i8 };
            return Err(ValueError::Label(reported));
        }
        Ok(Label::Digit(value))
    }

    /// Convert from the signed representation where -1 means unknown
    pub const fn from_i8(value: i8) -> Result<Self, ValueError> {
        match value {
            Self::UNKNOWN => Ok(Label::Unknown),
            0..=9 => Ok(Label::Digit(value as u8)),
            _ => Err(ValueError::Label(value)),
        }
    }

    /// Signed representation: the digit, or -1 for unknown
    pub const fn as_i8(self) -> i8 {
        match self {
            Label::Digit(d) => d as i8,
            Label::Unknown => Self::UNKNOWN,
        }
    }

    /// The digit value, `None` for unknown
    pub const fn as_digit(self) -> Option<u8> {
        match self {
            Label::Digit(d) => Some(d),
            Label::Unknown => None,
        }
    }

    pub const fn is_known(self) -> bool {
        matches!(self, Label::Digit(_))
    }
}

impl TryFrom<i8> for Label {
    type Error = ValueError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Label::from_i8(value)
    }
}

impl From<Label> for i8 {
    fn from(label: Label) -> Self {
        label.as_i8()
    }
}

impl core::fmt::Display for Label {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Label::Digit(d) => write!(f, "{d}"),
            Label::Unknown => write!(f, "?"),
        }
    }
}

/// Fixed-size grid of 8-bit intensities with an optional digit label
///
/// Pixels are stored row-major. Dimensions never change after construction;
/// equality and hashing cover the shape, the label and every pixel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    shape: Shape,
    label: Label,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create an all-white bitmap
    pub fn new(rows: usize, columns: usize, label: Label) -> Result<Self, ValueError> {
        let shape = checked_shape(rows, columns)?;
        Ok(Self {
            shape,
            label,
            pixels: vec![WHITE; shape.len()],
        })
    }

    /// Create an all-white bitmap with an unknown label
    pub fn unlabeled(rows: usize, columns: usize) -> Result<Self, ValueError> {
        Self::new(rows, columns, Label::Unknown)
    }

    /// Wrap a row-major pixel buffer
    pub fn from_pixels(
        rows: usize,
        columns: usize,
        pixels: Vec<u8>,
        label: Label,
    ) -> Result<Self, ValueError> {
        let shape = checked_shape(rows, columns)?;
        if pixels.len() != shape.len() {
            return Err(ValueError::PixelCount {
                expected: shape.len(),
                found: pixels.len(),
            });
        }
        Ok(Self {
            shape,
            label,
            pixels,
        })
    }

    /// Build a bitmap from signed intensities, rejecting anything outside 0..=255
    pub fn from_intensities<I>(
        rows: usize,
        columns: usize,
        values: I,
        label: Label,
    ) -> Result<Self, ValueError>
    where
        I: IntoIterator<Item = i32>,
    {
        let pixels = values
            .into_iter()
            .map(checked_intensity)
            .collect::<Result<Vec<u8>, ValueError>>()?;
        Self::from_pixels(rows, columns, pixels, label)
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn columns(&self) -> usize {
        self.shape.columns
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn label(&self) -> Label {
        self.label
    }

    /// Same pixels under a different label
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    /// Row-major pixel data
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels of one row
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.shape.columns;
        &self.pixels[start..start + self.shape.columns]
    }

    /// Intensity at `(row, column)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> u8 {
        assert!(
            row < self.shape.rows && column < self.shape.columns,
            "coordinate ({row}, {column}) outside {} bitmap",
            self.shape
        );
        self.pixels[row * self.shape.columns + column]
    }

    pub fn try_get(&self, row: usize, column: usize) -> Option<u8> {
        self.index(row, column).map(|i| self.pixels[i])
    }

    /// Overwrite the intensity at `(row, column)`
    pub fn set(&mut self, row: usize, column: usize, value: u8) -> Result<(), ValueError> {
        let index = self
            .index(row, column)
            .ok_or(ValueError::Coordinate { row, column })?;
        self.pixels[index] = value;
        Ok(())
    }

    /// Like [`Bitmap::set`] for intensities computed as signed integers
    pub fn set_intensity(&mut self, row: usize, column: usize, value: i32) -> Result<(), ValueError> {
        let value = checked_intensity(value)?;
        self.set(row, column, value)
    }

    pub fn is_white(&self, row: usize, column: usize, threshold: u8) -> bool {
        self.get(row, column) < threshold
    }

    pub fn is_black(&self, row: usize, column: usize, threshold: u8) -> bool {
        self.get(row, column) >= threshold
    }

    pub fn is_white_default(&self, row: usize, column: usize) -> bool {
        self.is_white(row, column, DEFAULT_THRESHOLD)
    }

    pub fn is_black_default(&self, row: usize, column: usize) -> bool {
        self.is_black(row, column, DEFAULT_THRESHOLD)
    }

    /// ASCII rendering: `*` for black cells, space for white, one line per row
    pub fn render(&self, threshold: u8) -> String {
        let mut out = String::with_capacity(self.shape.len() + self.shape.rows);
        for (r, row) in self.pixels.chunks_exact(self.shape.columns).enumerate() {
            if r > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|&p| if p >= threshold { '*' } else { ' ' }));
        }
        out
    }

    pub fn render_default(&self) -> String {
        self.render(DEFAULT_THRESHOLD)
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.shape.rows && column < self.shape.columns)
            .then(|| row * self.shape.columns + column)
    }
}

/// Numeric dump: each intensity right-aligned in three characters
impl core::fmt::Display for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (r, row) in self.pixels.chunks_exact(self.shape.columns).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for pixel in row {
                write!(f, " {pixel:>3}")?;
            }
        }
        Ok(())
    }
}

fn checked_shape(rows: usize, columns: usize) -> Result<Shape, ValueError> {
    let shape = Shape::new(rows, columns);
    if shape.is_empty() {
        return Err(ValueError::Dimension);
    }
    Ok(shape)
}

fn checked_intensity(value: i32) -> Result<u8, ValueError> {
    if !(WHITE as i32..=BLACK as i32).contains(&value) {
        return Err(ValueError::Pixel(value));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn checker() -> Bitmap {
        Bitmap::from_pixels(2, 3, vec![255, 0, 200, 7, 128, 127], Label::Digit(4)).unwrap()
    }

    #[test]
    fn test_label_conversions() {
        assert_eq!(Label::from_i8(-1), Ok(Label::Unknown));
        assert_eq!(Label::from_i8(0), Ok(Label::Digit(0)));
        assert_eq!(Label::from_i8(9), Ok(Label::Digit(9)));
        assert_eq!(Label::from_i8(10), Err(ValueError::Label(10)));
        assert_eq!(Label::from_i8(-2), Err(ValueError::Label(-2)));
        assert_eq!(Label::digit(10), Err(ValueError::Label(10)));
        assert_eq!(Label::digit(200), Err(ValueError::Label(127)));
        assert_eq!(Label::Unknown.as_i8(), -1);
        assert_eq!(i8::from(Label::Digit(7)), 7);
        assert_eq!(Label::Unknown.to_string(), "?");
    }

    #[test]
    fn test_constructors_reject_bad_input() {
        assert_eq!(Bitmap::new(0, 5, Label::Unknown), Err(ValueError::Dimension));
        assert_eq!(Bitmap::unlabeled(5, 0), Err(ValueError::Dimension));
        assert_eq!(
            Bitmap::from_pixels(2, 2, vec![0; 3], Label::Unknown),
            Err(ValueError::PixelCount {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            Bitmap::from_intensities(1, 2, [10, 256], Label::Unknown),
            Err(ValueError::Pixel(256))
        );
        assert_eq!(
            Bitmap::from_intensities(1, 2, [-1, 3], Label::Unknown),
            Err(ValueError::Pixel(-1))
        );
    }

    #[test]
    fn test_get_and_set() {
        let mut bitmap = Bitmap::unlabeled(3, 2).unwrap();
        assert_eq!(bitmap.get(2, 1), 0);
        bitmap.set(2, 1, 99).unwrap();
        assert_eq!(bitmap.get(2, 1), 99);
        assert_eq!(bitmap.try_get(3, 0), None);
        assert_eq!(
            bitmap.set(3, 0, 1),
            Err(ValueError::Coordinate { row: 3, column: 0 })
        );
        assert_eq!(bitmap.set_intensity(0, 0, 300), Err(ValueError::Pixel(300)));
        bitmap.set_intensity(0, 0, 255).unwrap();
        assert_eq!(bitmap.row(0), &[255, 0]);
    }

    #[test]
    fn test_thresholds() {
        let bitmap = checker();
        assert!(bitmap.is_black_default(0, 0));
        assert!(bitmap.is_white_default(0, 1));
        assert!(bitmap.is_black_default(1, 1)); // 128 is black
        assert!(bitmap.is_white_default(1, 2)); // 127 is white
        assert!(bitmap.is_white(0, 2, 201));
        assert!(bitmap.is_black(1, 0, 7));
    }

    #[test]
    fn test_render() {
        assert_eq!(checker().render_default(), "* *\n * ");
        assert_eq!(checker().render(1), "* *\n***");
    }

    #[test]
    fn test_display() {
        assert_eq!(checker().to_string(), " 255   0 200\n   7 128 127");
    }

    #[test]
    fn test_equality_includes_label() {
        let a = checker();
        let b = checker().with_label(Label::Digit(5));
        assert_ne!(a, b);
        assert_eq!(a, b.with_label(Label::Digit(4)));

        let mut c = checker();
        c.set(0, 0, 254).unwrap();
        assert_ne!(a, c);

        // Same pixel count, different shape
        let d = Bitmap::from_pixels(3, 2, checker().pixels().to_vec(), Label::Digit(4)).unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(bitmap: &Bitmap) -> u64 {
            let mut hasher = DefaultHasher::new();
            bitmap.hash(&mut hasher);
            hasher.finish()
        }

        let mut built = Bitmap::new(2, 3, Label::Digit(4)).unwrap();
        for (i, value) in [255, 0, 200, 7, 128, 127].into_iter().enumerate() {
            built.set_intensity(i / 3, i % 3, value).unwrap();
        }
        let parsed = Bitmap::from_intensities(2, 3, [255, 0, 200, 7, 128, 127], Label::Digit(4)).unwrap();
        assert_eq!(built, checker());
        assert_eq!(parsed, checker());
        assert_eq!(hash_of(&built), hash_of(&checker()));
        assert_eq!(hash_of(&parsed), hash_of(&built));

        let relabeled = checker().with_label(Label::Unknown);
        assert_ne!(relabeled, checker());
        assert_eq!(relabeled.pixels(), checker().pixels());
    }

    #[test]
    fn test_label_accessors() {
        assert_eq!(Label::Digit(3).as_digit(), Some(3));
        assert_eq!(Label::Unknown.as_digit(), None);
        assert!(Label::Digit(0).is_known());
        assert!(!Label::default().is_known());
        assert!(Bitmap::unlabeled(1, 2).unwrap().pixels().iter().all(|&p| p == WHITE));
    }
}
