//! Call-site boundary for matrix-based filters.
//!
//! A host hands a [`ProcessorImage`] to a filter; the filter works on the
//! matrix representation and the result is converted back for display.
//! [`run_filter`] drives that round trip so every call site shares the same
//! format check and conversion policy.
//!
//! # Example
//!
//! ```rust
//! use cvbridge_core::filter::{run_filter, FnFilter, FormatSet};
//! use cvbridge_core::{ConvertOptions, MatrixImage, ProcessorImage};
//!
//! let invert = FnFilter::new("invert", |src: &MatrixImage| {
//!     let mut dst = src.clone();
//!     dst.data_mut().iter_mut().for_each(|v| *v = 255 - *v);
//!     Ok(dst)
//! })
//! .accepting(FormatSet::GRAY8);
//!
//! let img = ProcessorImage::gray8(2, 1, vec![0, 200]).unwrap();
//! let out = run_filter(&invert, &img, &ConvertOptions::default()).unwrap();
//! assert_eq!(out.data::<u8>().unwrap(), &[255, 55]);
//! ```

use crate::codec::{matrix_to_processor_with, processor_to_matrix_with, ConvertOptions};
use crate::{Error, MatrixImage, PixelFormat, ProcessorImage, Result};
use std::fmt;
use std::ops::BitOr;
use tracing::debug;

/// Set of processor formats a filter can handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatSet(u8);

impl FormatSet {
    /// No formats.
    pub const EMPTY: FormatSet = FormatSet(0);
    /// 8-bit gray only.
    pub const GRAY8: FormatSet = FormatSet::of(PixelFormat::Gray8);
    /// 16-bit gray only.
    pub const GRAY16: FormatSet = FormatSet::of(PixelFormat::Gray16);
    /// Float gray only.
    pub const GRAY_F32: FormatSet = FormatSet::of(PixelFormat::GrayF32);
    /// Packed RGB only.
    pub const RGB8: FormatSet = FormatSet::of(PixelFormat::Rgb8);
    /// Every gray format.
    pub const GRAY: FormatSet = Self::GRAY8.union(Self::GRAY16).union(Self::GRAY_F32);
    /// Every format.
    pub const ALL: FormatSet = Self::GRAY.union(Self::RGB8);

    const fn bit(format: PixelFormat) -> u8 {
        match format {
            PixelFormat::Gray8 => 1 << 0,
            PixelFormat::Gray16 => 1 << 1,
            PixelFormat::GrayF32 => 1 << 2,
            PixelFormat::Rgb8 => 1 << 3,
        }
    }

    /// Set holding a single format.
    pub const fn of(format: PixelFormat) -> Self {
        Self(Self::bit(format))
    }

    /// Union of two sets.
    pub const fn union(self, other: FormatSet) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether `format` is in the set.
    pub const fn contains(self, format: PixelFormat) -> bool {
        self.0 & Self::bit(format) != 0
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Formats in the set, in table order.
    pub fn iter(self) -> impl Iterator<Item = PixelFormat> {
        PixelFormat::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

impl BitOr for FormatSet {
    type Output = FormatSet;

    fn bitor(self, rhs: FormatSet) -> FormatSet {
        self.union(rhs)
    }
}

impl From<PixelFormat> for FormatSet {
    fn from(format: PixelFormat) -> Self {
        Self::of(format)
    }
}

impl FromIterator<PixelFormat> for FormatSet {
    fn from_iter<I: IntoIterator<Item = PixelFormat>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, f| set.union(Self::of(f)))
    }
}

impl fmt::Debug for FormatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// An operation that consumes and produces matrix images.
///
/// The operation itself lives outside this crate (typically a vision
/// library); implementors only adapt it to this signature.
pub trait MatrixFilter {
    /// Name used in log messages and errors.
    fn name(&self) -> &str;

    /// Processor formats this filter accepts.
    fn accepts(&self) -> FormatSet {
        FormatSet::ALL
    }

    /// Runs the operation.
    fn apply(&self, src: &MatrixImage) -> Result<MatrixImage>;
}

/// [`MatrixFilter`] built from a closure.
pub struct FnFilter<F> {
    name: String,
    accepts: FormatSet,
    op: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&MatrixImage) -> Result<MatrixImage>,
{
    /// Wraps `op`; accepts every format until narrowed with [`accepting`](Self::accepting).
    pub fn new(name: impl Into<String>, op: F) -> Self {
        Self {
            name: name.into(),
            accepts: FormatSet::ALL,
            op,
        }
    }

    /// Restricts the accepted formats.
    pub fn accepting(mut self, formats: FormatSet) -> Self {
        self.accepts = formats;
        self
    }
}

impl<F> MatrixFilter for FnFilter<F>
where
    F: Fn(&MatrixImage) -> Result<MatrixImage>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self) -> FormatSet {
        self.accepts
    }

    fn apply(&self, src: &MatrixImage) -> Result<MatrixImage> {
        (self.op)(src)
    }
}

/// Converts `image` to a matrix, applies `filter`, and converts the result back.
///
/// The filter's output goes through the same validation as any other
/// matrix, so a filter that produces e.g. a 2-channel matrix fails with
/// [`Error::UnsupportedFormat`] instead of yielding a guessed layout.
///
/// # Errors
///
/// - [`Error::FilterRejected`] if the image format is not in `filter.accepts()`
/// - any error returned by the filter
/// - any error from converting the filter's output
pub fn run_filter<F>(filter: &F, image: &ProcessorImage, opts: &ConvertOptions) -> Result<ProcessorImage>
where
    F: MatrixFilter + ?Sized,
{
    let format = image.format();
    if !filter.accepts().contains(format) {
        debug!(filter = filter.name(), %format, "format not accepted");
        return Err(Error::filter_rejected(filter.name(), format));
    }

    let (width, height) = image.dimensions();
    debug!(filter = filter.name(), width, height, %format, "running filter");

    let src = processor_to_matrix_with(image, opts);
    let dst = filter.apply(&src)?;
    let result = matrix_to_processor_with(&dst, opts)?;

    debug!(
        filter = filter.name(),
        width = result.width(),
        height = result.height(),
        format = %result.format(),
        "filter finished"
    );
    Ok(result)
}
