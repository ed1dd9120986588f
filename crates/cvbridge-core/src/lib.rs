//! # cvbridge-core
//!
//! Conversion between two in-memory raster representations:
//!
//! - [`ProcessorImage`] - one flat typed array per image with a
//!   [`PixelFormat`] tag (8-bit gray, 16-bit gray, float gray, packed RGB)
//! - [`MatrixImage`] - a rectangular buffer described by a [`MatType`]
//!   (element type + channel count) with interleaved channels
//!
//! ## Conversion Policy
//!
//! - Exactly four pairings are legal, listed once in [`FORMAT_TABLE`].
//!   Any other matrix type fails with [`Error::UnsupportedFormat`].
//! - Every conversion allocates a fresh destination buffer. Input and output
//!   never share storage.
//! - Three-channel matrices are B,G,R interleaved; packed RGB is
//!   `0x00RRGGBB`. The swap lives in [`layout`].
//!
//! ```rust
//! use cvbridge_core::prelude::*;
//!
//! let img = ProcessorImage::rgb8(1, 1, vec![0x102030])?;
//! let mat = processor_to_matrix(&img);
//! assert_eq!(mat.data(), &[0x30, 0x20, 0x10]);
//!
//! let back = matrix_to_processor(&mat)?;
//! assert_eq!(back, img);
//! # Ok::<(), cvbridge_core::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! cvbridge-core (this crate)
//!    ^
//!    |
//!    +-- cvbridge-tests (integration tests)
//!    +-- cvbridge-bench (criterion benchmarks)
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - row-parallel RGB packing via rayon (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod error;
pub mod filter;
pub mod format;
pub mod layout;
pub mod matrix;
pub mod processor;

// Re-exports for convenience
pub use codec::{
    matrix_to_processor, matrix_to_processor_with, processor_to_matrix, processor_to_matrix_with,
    ConvertOptions,
};
pub use error::{Error, Result};
pub use format::{ElementType, MatType, PixelFormat, FORMAT_TABLE};
pub use matrix::MatrixImage;
pub use processor::{Element, Pixels, ProcessorImage};

/// Prelude module for convenient imports.
///
/// ```
/// use cvbridge_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::codec::{
        matrix_to_processor, matrix_to_processor_with, processor_to_matrix,
        processor_to_matrix_with, ConvertOptions,
    };
    pub use crate::error::{Error, Result};
    pub use crate::filter::{run_filter, FnFilter, FormatSet, MatrixFilter};
    pub use crate::format::{ElementType, MatType, PixelFormat, FORMAT_TABLE};
    pub use crate::matrix::MatrixImage;
    pub use crate::processor::{Pixels, ProcessorImage};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_prelude_covers_format_table() {
        use crate::prelude::*;
        for (format, mat_type) in FORMAT_TABLE {
            assert_eq!(PixelFormat::for_mat_type(mat_type), Ok(format));
        }
    }
}
