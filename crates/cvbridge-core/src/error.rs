//! Error types for cvbridge-core operations.
//!
//! Every failure in this crate is local and synchronous: a conversion either
//! returns a complete, freshly allocated image or one of the [`Error`]
//! variants below. Nothing is retried and no partial image is ever produced.
//!
//! # Usage
//!
//! ```rust
//! use cvbridge_core::{Error, MatType, ElementType, MatrixImage, matrix_to_processor};
//!
//! let two_channel = MatType::new(ElementType::U8, 2).unwrap();
//! let mat = MatrixImage::zeros(4, 4, two_channel).unwrap();
//!
//! let err = matrix_to_processor(&mat).unwrap_err();
//! assert!(err.is_unsupported_format());
//! assert!(err.to_string().contains("CV_8UC2"));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro for [`std::error::Error`] and `Display`

use crate::format::{MatType, PixelFormat};
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting between processor and matrix images.
///
/// # Categories
///
/// - **Format errors**: [`UnsupportedFormat`](Error::UnsupportedFormat),
///   [`InvalidChannels`](Error::InvalidChannels), [`InvalidTypeCode`](Error::InvalidTypeCode)
/// - **Buffer errors**: [`BufferSizeMismatch`](Error::BufferSizeMismatch),
///   [`ElementSizeMismatch`](Error::ElementSizeMismatch),
///   [`InvalidDimensions`](Error::InvalidDimensions)
/// - **Filter errors**: [`FilterRejected`](Error::FilterRejected), [`Other`](Error::Other)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The matrix element type and channel count have no processor equivalent.
    ///
    /// Only `CV_8UC1`, `CV_8UC3`, `CV_16UC1` and `CV_32FC1` can be converted.
    #[error(
        "cannot convert matrix of type {mat_type} ({depth}, {channels} channels, code {code})",
        depth = .mat_type.depth(),
        channels = .mat_type.channels(),
        code = .mat_type.code()
    )]
    UnsupportedFormat {
        /// Observed matrix type
        mat_type: MatType,
    },

    /// A pixel buffer does not have the length implied by its geometry.
    #[error("buffer size mismatch: expected length {expected}, got {actual}")]
    BufferSizeMismatch {
        /// Length implied by width, height and format
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Typed elements whose width differs from the matrix depth.
    #[error("element size mismatch: {mat_type} needs {expected}-byte elements, got {actual}")]
    ElementSizeMismatch {
        /// Target matrix type
        mat_type: MatType,
        /// Element size of the matrix depth
        expected: usize,
        /// Size of the supplied element type
        actual: usize,
    },

    /// Image dimensions cannot be represented (buffer size overflows `usize`).
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions are invalid
        reason: String,
    },

    /// Matrix channel count outside `1..=512`.
    #[error("invalid channel count {channels}, expected 1..={max}", max = MatType::MAX_CHANNELS)]
    InvalidChannels {
        /// Requested channel count
        channels: u32,
    },

    /// Integer matrix type code that does not decode to a valid type.
    #[error("invalid matrix type code {code}")]
    InvalidTypeCode {
        /// Offending code
        code: i32,
    },

    /// A filter was handed a processor format it does not declare support for.
    #[error("filter '{filter}' does not accept {format} images")]
    FilterRejected {
        /// Filter name
        filter: String,
        /// Format of the rejected image
        format: PixelFormat,
    },

    /// Free-form failure, mostly raised by filters.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(mat_type: MatType) -> Self {
        Self::UnsupportedFormat { mat_type }
    }

    /// Creates an [`Error::BufferSizeMismatch`] error.
    #[inline]
    pub fn buffer_size_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::FilterRejected`] error.
    #[inline]
    pub fn filter_rejected(filter: impl Into<String>, format: PixelFormat) -> Self {
        Self::FilterRejected {
            filter: filter.into(),
            format,
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is an [`Error::UnsupportedFormat`].
    #[inline]
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Returns `true` if the error describes a buffer whose size is wrong.
    #[inline]
    pub fn is_size_error(&self) -> bool {
        matches!(
            self,
            Self::BufferSizeMismatch { .. }
                | Self::ElementSizeMismatch { .. }
                | Self::InvalidDimensions { .. }
        )
    }
}
