//! Processor images: one flat, typed pixel array per image.
//!
//! A [`ProcessorImage`] holds exactly `width * height` elements. The element
//! type is carried by the [`Pixels`] variant, so the pixel format can never
//! disagree with the buffer it describes.
//!
//! # Usage
//!
//! ```rust
//! use cvbridge_core::{PixelFormat, ProcessorImage};
//!
//! let img = ProcessorImage::rgb8(2, 1, vec![0x102030, 0x405060]).unwrap();
//! assert_eq!(img.format(), PixelFormat::Rgb8);
//! assert_eq!(img.data::<u32>().unwrap()[1], 0x405060);
//! assert!(img.data::<u8>().is_none());
//! ```

use crate::{Error, PixelFormat, Result};

/// Tagged processor pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    /// 8-bit gray.
    Gray8(Vec<u8>),
    /// 16-bit gray.
    Gray16(Vec<u16>),
    /// 32-bit float gray.
    GrayF32(Vec<f32>),
    /// Packed RGB (`0x00RRGGBB`).
    Rgb8(Vec<u32>),
}

impl Pixels {
    /// Allocates a zeroed buffer of `len` elements.
    pub fn zeros(format: PixelFormat, len: usize) -> Self {
        match format {
            PixelFormat::Gray8 => Self::Gray8(vec![0; len]),
            PixelFormat::Gray16 => Self::Gray16(vec![0; len]),
            PixelFormat::GrayF32 => Self::GrayF32(vec![0.0; len]),
            PixelFormat::Rgb8 => Self::Rgb8(vec![0; len]),
        }
    }

    /// Format implied by the variant.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        match self {
            Self::Gray8(_) => PixelFormat::Gray8,
            Self::Gray16(_) => PixelFormat::Gray16,
            Self::GrayF32(_) => PixelFormat::GrayF32,
            Self::Rgb8(_) => PixelFormat::Rgb8,
        }
    }

    /// Number of elements (pixels).
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Gray8(v) => v.len(),
            Self::Gray16(v) => v.len(),
            Self::GrayF32(v) => v.len(),
            Self::Rgb8(v) => v.len(),
        }
    }

    /// Returns `true` if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of the buffer in native byte order.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Gray8(v) => v.as_slice(),
            Self::Gray16(v) => bytemuck::cast_slice(v),
            Self::GrayF32(v) => bytemuck::cast_slice(v),
            Self::Rgb8(v) => bytemuck::cast_slice(v),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
    impl Sealed for u32 {}
}

/// Element type of a processor buffer.
///
/// Implemented for `u8` (Gray8), `u16` (Gray16), `f32` (GrayF32) and
/// `u32` (Rgb8). Sealed: the set of formats is closed.
pub trait Element: bytemuck::Pod + Send + Sync + sealed::Sealed {
    /// Processor format stored with this element type.
    const FORMAT: PixelFormat;

    /// Wraps a vector in the matching [`Pixels`] variant.
    fn wrap(data: Vec<Self>) -> Pixels;

    /// Borrows the buffer if `pixels` holds this element type.
    fn slice(pixels: &Pixels) -> Option<&[Self]>;

    /// Mutably borrows the buffer if `pixels` holds this element type.
    fn slice_mut(pixels: &mut Pixels) -> Option<&mut [Self]>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const FORMAT: PixelFormat = PixelFormat::$variant;

            #[inline]
            fn wrap(data: Vec<Self>) -> Pixels {
                Pixels::$variant(data)
            }

            #[inline]
            fn slice(pixels: &Pixels) -> Option<&[Self]> {
                match pixels {
                    Pixels::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn slice_mut(pixels: &mut Pixels) -> Option<&mut [Self]> {
                match pixels {
                    Pixels::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(u8, Gray8);
impl_element!(u16, Gray16);
impl_element!(f32, GrayF32);
impl_element!(u32, Rgb8);

/// Number of pixels in a `width x height` image, checked for overflow.
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))
}

/// Processor-model image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorImage {
    width: u32,
    height: u32,
    pixels: Pixels,
}

impl ProcessorImage {
    /// Creates an image from a tagged buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] unless `pixels.len() == width * height`.
    pub fn new(width: u32, height: u32, pixels: Pixels) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::buffer_size_mismatch(expected, pixels.len()));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates an image from a typed vector; the format follows from `T`.
    pub fn from_vec<T: Element>(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        Self::new(width, height, T::wrap(data))
    }

    /// Creates an 8-bit gray image.
    pub fn gray8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_vec(width, height, data)
    }

    /// Creates a 16-bit gray image.
    pub fn gray16(width: u32, height: u32, data: Vec<u16>) -> Result<Self> {
        Self::from_vec(width, height, data)
    }

    /// Creates a float gray image.
    pub fn gray_f32(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        Self::from_vec(width, height, data)
    }

    /// Creates a packed RGB image.
    pub fn rgb8(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        Self::from_vec(width, height, data)
    }

    /// Creates a zero-filled image.
    pub fn zeros(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: Pixels::zeros(format, len),
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.pixels.format()
    }

    /// Tagged pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// Typed pixel slice, or `None` if `T` does not match the format.
    #[inline]
    pub fn data<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.pixels)
    }

    /// Mutable typed pixel slice, or `None` if `T` does not match the format.
    ///
    /// The buffer length cannot change through this slice.
    #[inline]
    pub fn data_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.pixels)
    }

    /// Consumes the image and returns its buffer.
    #[inline]
    pub fn into_pixels(self) -> Pixels {
        self.pixels
    }
}
