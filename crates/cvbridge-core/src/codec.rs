//! Conversions between [`ProcessorImage`] and [`MatrixImage`].
//!
//! Both directions always allocate a fresh destination buffer and copy into
//! it; an output never shares storage with its input.
//!
//! | from | to | rule |
//! |------|----|------|
//! | `CV_8UC1`  | `Gray8`   | bytes copied verbatim |
//! | `CV_16UC1` | `Gray16`  | native-endian `u16` copied verbatim |
//! | `CV_32FC1` | `GrayF32` | native-endian `f32` copied bit-for-bit (NaN/Inf kept) |
//! | `CV_8UC3`  | `Rgb8`    | B,G,R bytes packed to `(R << 16) \| (G << 8) \| B` |
//!
//! Any other matrix type fails with [`Error::UnsupportedFormat`].
//!
//! # Example
//!
//! ```rust
//! use cvbridge_core::{matrix_to_processor, processor_to_matrix, MatType, MatrixImage};
//!
//! let mat = MatrixImage::new(2, 1, MatType::CV_8UC3, vec![10, 20, 30, 40, 50, 60]).unwrap();
//! let img = matrix_to_processor(&mat).unwrap();
//! assert_eq!(img.data::<u32>().unwrap(), &[0x1E140A, 0x3C3228]);
//!
//! let back = processor_to_matrix(&img);
//! assert_eq!(back, mat);
//! ```

use crate::layout::{pack_bgr_slice, unpack_bgr_slice, BGR_PIXEL_SIZE};
use crate::{Error, MatrixImage, PixelFormat, Pixels, ProcessorImage, Result};
use tracing::{debug, trace};

/// Tuning for conversions.
///
/// Output never depends on these settings, only how the work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Allow row-parallel packing/unpacking of RGB images.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,
    /// Smallest pixel count for which the parallel path is taken.
    pub min_parallel_pixels: usize,
}

impl ConvertOptions {
    /// Default threshold for the parallel path (256x256 pixels).
    pub const DEFAULT_MIN_PARALLEL_PIXELS: usize = 256 * 256;

    /// Options that always run on the calling thread.
    pub const fn sequential() -> Self {
        Self {
            parallel: false,
            min_parallel_pixels: Self::DEFAULT_MIN_PARALLEL_PIXELS,
        }
    }

    /// Enables or disables the parallel path.
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the pixel count at which the parallel path starts.
    pub const fn with_min_parallel_pixels(mut self, pixels: usize) -> Self {
        self.min_parallel_pixels = pixels;
        self
    }

    #[allow(dead_code)]
    fn use_parallel(&self, width: usize, pixels: usize) -> bool {
        self.parallel && width > 0 && pixels >= self.min_parallel_pixels
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            min_parallel_pixels: Self::DEFAULT_MIN_PARALLEL_PIXELS,
        }
    }
}

// ============================================================================
// Matrix -> Processor
// ============================================================================

/// Converts a matrix image to a processor image with default options.
///
/// # Errors
///
/// - [`Error::UnsupportedFormat`] if the matrix type has no processor format
/// - [`Error::BufferSizeMismatch`] if the matrix buffer length is inconsistent
pub fn matrix_to_processor(mat: &MatrixImage) -> Result<ProcessorImage> {
    matrix_to_processor_with(mat, &ConvertOptions::default())
}

/// Converts a matrix image to a processor image.
///
/// See [`matrix_to_processor`].
pub fn matrix_to_processor_with(mat: &MatrixImage, opts: &ConvertOptions) -> Result<ProcessorImage> {
    let (width, height) = mat.dimensions();
    trace!(width, height, mat_type = %mat.mat_type(), "matrix_to_processor");

    let format = PixelFormat::for_mat_type(mat.mat_type()).inspect_err(|err| {
        debug!(width, height, code = mat.mat_type().code(), "rejecting matrix: {err}");
    })?;

    let expected = MatrixImage::byte_len(width, height, mat.mat_type())?;
    if mat.data().len() != expected {
        return Err(Error::buffer_size_mismatch(expected, mat.data().len()));
    }

    let pixels = match format {
        PixelFormat::Gray8 => Pixels::Gray8(mat.data().to_vec()),
        PixelFormat::Gray16 => Pixels::Gray16(bytemuck::pod_collect_to_vec(mat.data())),
        PixelFormat::GrayF32 => Pixels::GrayF32(bytemuck::pod_collect_to_vec(mat.data())),
        PixelFormat::Rgb8 => Pixels::Rgb8(pack_rgb(mat, opts)),
    };
    ProcessorImage::new(width, height, pixels)
}

fn pack_rgb(mat: &MatrixImage, opts: &ConvertOptions) -> Vec<u32> {
    let width = mat.width() as usize;
    let src = mat.data();
    let mut dst = vec![0u32; mat.pixel_count()];

    #[cfg(feature = "parallel")]
    if opts.use_parallel(width, dst.len()) {
        use rayon::prelude::*;
        dst.par_chunks_mut(width)
            .zip(src.par_chunks(width * BGR_PIXEL_SIZE))
            .for_each(|(out, row)| pack_bgr_slice(row, out));
        return dst;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = (width, opts);

    pack_bgr_slice(src, &mut dst);
    dst
}

// ============================================================================
// Processor -> Matrix
// ============================================================================

/// Converts a processor image to a matrix image with default options.
///
/// Every processor format has a matrix equivalent, so this cannot fail.
pub fn processor_to_matrix(img: &ProcessorImage) -> MatrixImage {
    processor_to_matrix_with(img, &ConvertOptions::default())
}

/// Converts a processor image to a matrix image.
///
/// See [`processor_to_matrix`].
pub fn processor_to_matrix_with(img: &ProcessorImage, opts: &ConvertOptions) -> MatrixImage {
    let (width, height) = img.dimensions();
    let format = img.format();
    trace!(width, height, %format, "processor_to_matrix");

    let data = match img.pixels() {
        Pixels::Gray8(_) | Pixels::Gray16(_) | Pixels::GrayF32(_) => img.pixels().as_bytes().to_vec(),
        Pixels::Rgb8(packed) => unpack_rgb(packed, width as usize, opts),
    };
    MatrixImage::from_parts(width, height, format.mat_type(), data)
}

fn unpack_rgb(src: &[u32], width: usize, opts: &ConvertOptions) -> Vec<u8> {
    let mut dst = vec![0u8; src.len() * BGR_PIXEL_SIZE];

    #[cfg(feature = "parallel")]
    if opts.use_parallel(width, src.len()) {
        use rayon::prelude::*;
        dst.par_chunks_mut(width * BGR_PIXEL_SIZE)
            .zip(src.par_chunks(width))
            .for_each(|(out, row)| unpack_bgr_slice(row, out));
        return dst;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = (width, opts);

    unpack_bgr_slice(src, &mut dst);
    dst
}

// ============================================================================
// Trait conversions
// ============================================================================

impl TryFrom<&MatrixImage> for ProcessorImage {
    type Error = Error;

    fn try_from(mat: &MatrixImage) -> Result<Self> {
        matrix_to_processor(mat)
    }
}

impl From<&ProcessorImage> for MatrixImage {
    fn from(img: &ProcessorImage) -> Self {
        processor_to_matrix(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementType, MatType};

    fn all_options() -> [ConvertOptions; 2] {
        [
            ConvertOptions::sequential(),
            ConvertOptions::default()
                .with_parallel(true)
                .with_min_parallel_pixels(0),
        ]
    }

    #[test]
    fn test_rgb_matrix_example() {
        let mat = MatrixImage::new(2, 1, MatType::CV_8UC3, vec![10, 20, 30, 40, 50, 60]).unwrap();
        for opts in all_options() {
            let img = matrix_to_processor_with(&mat, &opts).unwrap();
            assert_eq!(img.format(), PixelFormat::Rgb8);
            assert_eq!(img.dimensions(), (2, 1));
            assert_eq!(img.data::<u32>().unwrap(), &[0x1E140A, 0x3C3228]);
        }
    }

    #[test]
    fn test_single_pixel_channel_order() {
        let img = ProcessorImage::rgb8(1, 1, vec![0x102030]).unwrap();
        let mat = processor_to_matrix(&img);
        assert_eq!(mat.mat_type(), MatType::CV_8UC3);
        assert_eq!(mat.data(), &[0x30, 0x20, 0x10]);

        let back = matrix_to_processor(&mat).unwrap();
        assert_eq!(back.data::<u32>().unwrap(), &[0x102030]);
    }

    #[test]
    fn test_matrix_pixel_packs_red_high() {
        let mat = MatrixImage::new(1, 1, MatType::CV_8UC3, vec![10, 20, 30]).unwrap();
        let img = matrix_to_processor(&mat).unwrap();
        assert_eq!(img.data::<u32>().unwrap()[0], (30 << 16) | (20 << 8) | 10);
    }

    #[test]
    fn test_rgb_high_byte_dropped() {
        let img = ProcessorImage::rgb8(2, 1, vec![0xFF112233, 0x7F000000]).unwrap();
        for opts in all_options() {
            let mat = processor_to_matrix_with(&img, &opts);
            let back = matrix_to_processor_with(&mat, &opts).unwrap();
            assert_eq!(back.data::<u32>().unwrap(), &[0x112233, 0]);
        }
    }

    #[test]
    fn test_gray8_roundtrip() {
        let img = ProcessorImage::gray8(3, 2, vec![0, 1, 127, 128, 254, 255]).unwrap();
        let mat = processor_to_matrix(&img);
        assert_eq!(mat.mat_type(), MatType::CV_8UC1);
        assert_eq!(mat.data(), &[0, 1, 127, 128, 254, 255]);
        assert_eq!(matrix_to_processor(&mat).unwrap(), img);
    }

    #[test]
    fn test_gray16_roundtrip() {
        let img = ProcessorImage::gray16(2, 2, vec![0, 1, 0x8000, 0xFFFF]).unwrap();
        let mat = processor_to_matrix(&img);
        assert_eq!(mat.mat_type(), MatType::CV_16UC1);
        assert_eq!(mat.data().len(), 8);
        assert_eq!(matrix_to_processor(&mat).unwrap(), img);
    }

    #[test]
    fn test_gray16_native_byte_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x1234u16.to_ne_bytes());
        bytes.extend_from_slice(&0xBEEFu16.to_ne_bytes());
        let mat = MatrixImage::new(2, 1, MatType::CV_16UC1, bytes).unwrap();
        let img = matrix_to_processor(&mat).unwrap();
        assert_eq!(img.data::<u16>().unwrap(), &[0x1234, 0xBEEF]);
    }

    #[test]
    fn test_float_special_values_pass_through() {
        let values = vec![f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.0, 1.5, f32::MIN_POSITIVE];
        let img = ProcessorImage::gray_f32(3, 2, values.clone()).unwrap();
        let mat = processor_to_matrix(&img);
        assert_eq!(mat.mat_type(), MatType::CV_32FC1);

        let back = matrix_to_processor(&mat).unwrap();
        let got = back.data::<f32>().unwrap();
        for (a, b) in values.iter().zip(got) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_unsupported_types_rejected() {
        let rejected = [
            MatType::new(ElementType::U8, 2).unwrap(),
            MatType::new(ElementType::U8, 4).unwrap(),
            MatType::new(ElementType::S8, 1).unwrap(),
            MatType::new(ElementType::S16, 1).unwrap(),
            MatType::new(ElementType::U16, 3).unwrap(),
            MatType::new(ElementType::F64, 1).unwrap(),
        ];
        for mat_type in rejected {
            let mat = MatrixImage::zeros(2, 2, mat_type).unwrap();
            let err = matrix_to_processor(&mat).unwrap_err();
            assert_eq!(err, Error::unsupported_format(mat_type));
        }
    }

    #[test]
    fn test_empty_images() {
        for format in PixelFormat::ALL {
            for (w, h) in [(0, 0), (0, 4), (4, 0)] {
                let img = ProcessorImage::zeros(w, h, format).unwrap();
                for opts in all_options() {
                    let mat = processor_to_matrix_with(&img, &opts);
                    assert_eq!(mat.dimensions(), (w, h));
                    assert!(mat.data().is_empty());
                    let back = matrix_to_processor_with(&mat, &opts).unwrap();
                    assert_eq!(back, img);
                }
            }
        }
    }

    #[test]
    fn test_outputs_are_independent() {
        let mut mat = MatrixImage::new(2, 1, MatType::CV_8UC1, vec![1, 2]).unwrap();
        let mut img = matrix_to_processor(&mat).unwrap();
        img.data_mut::<u8>().unwrap()[0] = 99;
        assert_eq!(mat.data(), &[1, 2]);

        mat.data_mut()[1] = 42;
        assert_eq!(img.data::<u8>().unwrap(), &[99, 2]);

        let mut out = processor_to_matrix(&img);
        out.data_mut()[0] = 7;
        assert_eq!(img.data::<u8>().unwrap(), &[99, 2]);
    }

    #[test]
    fn test_trait_conversions() {
        let img = ProcessorImage::gray16(1, 1, vec![500]).unwrap();
        let mat = MatrixImage::from(&img);
        let back = ProcessorImage::try_from(&mat).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (w, h) = (37u32, 23u32);
        let packed: Vec<u32> = (0..w * h).map(|i| i.wrapping_mul(2654435761) & 0xFFFFFF).collect();
        let img = ProcessorImage::rgb8(w, h, packed).unwrap();

        let [seq, par] = all_options();
        let mat_seq = processor_to_matrix_with(&img, &seq);
        let mat_par = processor_to_matrix_with(&img, &par);
        assert_eq!(mat_seq, mat_par);

        let back_seq = matrix_to_processor_with(&mat_seq, &seq).unwrap();
        let back_par = matrix_to_processor_with(&mat_par, &par).unwrap();
        assert_eq!(back_seq, img);
        assert_eq!(back_par, img);
    }

    #[test]
    fn test_options() {
        let opts = ConvertOptions::sequential().with_min_parallel_pixels(10);
        assert!(!opts.parallel);
        assert_eq!(opts.min_parallel_pixels, 10);
        assert!(!opts.use_parallel(4, 100));
        assert!(opts.with_parallel(true).use_parallel(4, 100));
        assert!(!opts.with_parallel(true).use_parallel(0, 100));
        assert_eq!(
            ConvertOptions::default().min_parallel_pixels,
            ConvertOptions::DEFAULT_MIN_PARALLEL_PIXELS
        );
    }
}
