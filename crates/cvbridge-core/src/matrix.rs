//! Matrix images: interleaved rectangular buffers described by a [`MatType`].
//!
//! # Memory Layout
//!
//! Rows are stored top-to-bottom with no padding. Within a row, each pixel's
//! channels are adjacent. Multi-byte elements use native byte order.
//!
//! ```text
//! CV_8UC3:  [B G R B G R B G R ...]  <- row 0
//!           [B G R B G R B G R ...]  <- row 1
//! ```
//!
//! The buffer length is always `width * height * channels * element_size`.

use crate::processor::pixel_count;
use crate::{Error, MatType, Result};

/// Matrix-model image.
///
/// Any [`MatType`] can be described; only the four types in
/// [`FORMAT_TABLE`](crate::FORMAT_TABLE) convert to a processor image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixImage {
    width: u32,
    height: u32,
    mat_type: MatType,
    data: Vec<u8>,
}

impl MatrixImage {
    /// Byte length a `width x height` matrix of `mat_type` must have.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the size overflows `usize`.
    pub fn byte_len(width: u32, height: u32, mat_type: MatType) -> Result<usize> {
        pixel_count(width, height)?
            .checked_mul(mat_type.pixel_size())
            .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflows usize"))
    }

    /// Creates a matrix from raw interleaved bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] unless `data.len()` equals
    /// [`byte_len`](Self::byte_len).
    ///
    /// # Example
    ///
    /// ```rust
    /// use cvbridge_core::{MatType, MatrixImage};
    ///
    /// let mat = MatrixImage::new(2, 1, MatType::CV_8UC3, vec![10, 20, 30, 40, 50, 60]).unwrap();
    /// assert_eq!(mat.channels(), 3);
    /// assert!(MatrixImage::new(2, 1, MatType::CV_8UC3, vec![0; 5]).is_err());
    /// ```
    pub fn new(width: u32, height: u32, mat_type: MatType, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height, mat_type)?;
        if data.len() != expected {
            return Err(Error::buffer_size_mismatch(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            mat_type,
            data,
        })
    }

    /// Assembles a matrix whose buffer length the caller has already sized.
    pub(crate) fn from_parts(width: u32, height: u32, mat_type: MatType, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            Self::byte_len(width, height, mat_type).ok(),
            Some(data.len())
        );
        Self {
            width,
            height,
            mat_type,
            data,
        }
    }

    /// Creates a zero-filled matrix.
    pub fn zeros(width: u32, height: u32, mat_type: MatType) -> Result<Self> {
        let len = Self::byte_len(width, height, mat_type)?;
        Ok(Self {
            width,
            height,
            mat_type,
            data: vec![0; len],
        })
    }

    /// Creates a matrix from typed elements, copying them as native-endian bytes.
    ///
    /// `data` holds `width * height * channels` elements of `mat_type`'s depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementSizeMismatch`] if `T` is not as wide as the
    /// depth's element, and [`Error::BufferSizeMismatch`] if the element count
    /// is wrong.
    pub fn from_elements<T: bytemuck::Pod>(
        width: u32,
        height: u32,
        mat_type: MatType,
        data: &[T],
    ) -> Result<Self> {
        let element = std::mem::size_of::<T>();
        if element != mat_type.depth().size() {
            return Err(Error::ElementSizeMismatch {
                mat_type,
                expected: mat_type.depth().size(),
                actual: element,
            });
        }
        Self::new(width, height, mat_type, bytemuck::cast_slice::<T, u8>(data).to_vec())
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Element type and channel count.
    #[inline]
    pub fn mat_type(&self) -> MatType {
        self.mat_type
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.mat_type.channels()
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the matrix has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.mat_type.pixel_size()
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes. The length cannot change through this slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let stride = self.row_bytes();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Consumes the matrix and returns its bytes.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
