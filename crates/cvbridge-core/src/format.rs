//! Pixel formats, matrix element types and the table that relates them.
//!
//! # Types
//!
//! - [`PixelFormat`] - the four processor-side formats (closed set)
//! - [`ElementType`] - matrix element depth, the full matrix-library set
//! - [`MatType`] - element type plus channel count, with integer type codes
//!
//! # Correspondence
//!
//! [`FORMAT_TABLE`] is the single source of truth for which matrix types
//! have a processor equivalent:
//!
//! | PixelFormat | MatType    |
//! |-------------|------------|
//! | `Gray8`     | `CV_8UC1`  |
//! | `Rgb8`      | `CV_8UC3`  |
//! | `Gray16`    | `CV_16UC1` |
//! | `GrayF32`   | `CV_32FC1` |
//!
//! ```rust
//! use cvbridge_core::{MatType, PixelFormat};
//!
//! assert_eq!(PixelFormat::Rgb8.mat_type(), MatType::CV_8UC3);
//! assert_eq!(PixelFormat::for_mat_type(MatType::CV_16UC1).unwrap(), PixelFormat::Gray16);
//! assert!(PixelFormat::for_mat_type(MatType::from_code(1).unwrap()).is_err());
//! ```

use crate::{Error, Result};
use std::fmt;

/// Processor-side pixel format.
///
/// Each format fixes the element width and whether pixels are packed RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit unsigned gray, one byte per pixel.
    Gray8,
    /// 16-bit unsigned gray, one `u16` per pixel.
    Gray16,
    /// 32-bit float gray, one `f32` per pixel.
    GrayF32,
    /// Packed RGB, one `u32` per pixel: R in bits 16-23, G in 8-15, B in 0-7.
    Rgb8,
}

impl PixelFormat {
    /// All formats, in table order.
    pub const ALL: [PixelFormat; 4] = [Self::Gray8, Self::Rgb8, Self::Gray16, Self::GrayF32];

    /// Bytes per processor element.
    #[inline]
    pub const fn element_size(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Gray16 => 2,
            Self::GrayF32 | Self::Rgb8 => 4,
        }
    }

    /// Channel count of the matching matrix type.
    #[inline]
    pub const fn channels(&self) -> u32 {
        match self {
            Self::Rgb8 => 3,
            Self::Gray8 | Self::Gray16 | Self::GrayF32 => 1,
        }
    }

    /// Whether pixels are stored as packed RGB integers.
    #[inline]
    pub const fn is_packed_rgb(&self) -> bool {
        matches!(self, Self::Rgb8)
    }

    const fn table_index(&self) -> usize {
        match self {
            Self::Gray8 => 0,
            Self::Rgb8 => 1,
            Self::Gray16 => 2,
            Self::GrayF32 => 3,
        }
    }

    /// Matrix type this format converts to.
    #[inline]
    pub const fn mat_type(&self) -> MatType {
        FORMAT_TABLE[self.table_index()].1
    }

    /// Looks up the processor format for a matrix type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the type is not in [`FORMAT_TABLE`].
    pub fn for_mat_type(mat_type: MatType) -> Result<Self> {
        FORMAT_TABLE
            .iter()
            .find(|(_, t)| *t == mat_type)
            .map(|&(format, _)| format)
            .ok_or(Error::unsupported_format(mat_type))
    }

    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gray8 => "gray8",
            Self::Gray16 => "gray16",
            Self::GrayF32 => "gray_f32",
            Self::Rgb8 => "rgb8",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Matrix element depth.
///
/// Discriminants are the matrix library's depth codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    /// 8-bit unsigned.
    U8 = 0,
    /// 8-bit signed.
    S8 = 1,
    /// 16-bit unsigned.
    U16 = 2,
    /// 16-bit signed.
    S16 = 3,
    /// 32-bit signed.
    S32 = 4,
    /// 32-bit float.
    F32 = 5,
    /// 64-bit float.
    F64 = 6,
    /// 16-bit half float.
    F16 = 7,
}

impl ElementType {
    /// Bytes per element.
    #[inline]
    pub const fn size(&self) -> usize {
        match self {
            Self::U8 | Self::S8 => 1,
            Self::U16 | Self::S16 | Self::F16 => 2,
            Self::S32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Bits per element.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.size() as u32 * 8
    }

    /// Whether this is a floating-point type.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F16 | Self::F32 | Self::F64)
    }

    /// Whether this is a signed integer type.
    #[inline]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::S8 | Self::S16 | Self::S32)
    }

    /// Matrix-library depth code.
    #[inline]
    pub const fn code(&self) -> i32 {
        *self as i32
    }

    /// Decodes a depth code (`0..=7`).
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::U8),
            1 => Some(Self::S8),
            2 => Some(Self::U16),
            3 => Some(Self::S16),
            4 => Some(Self::S32),
            5 => Some(Self::F32),
            6 => Some(Self::F64),
            7 => Some(Self::F16),
            _ => None,
        }
    }

    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::S8 => "s8",
            Self::U16 => "u16",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::F16 => "f16",
        }
    }

    const fn suffix(&self) -> char {
        if self.is_float() {
            'F'
        } else if self.is_signed() {
            'S'
        } else {
            'U'
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Matrix element type together with its channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatType {
    depth: ElementType,
    channels: u32,
}

impl MatType {
    /// Largest channel count a matrix may have.
    pub const MAX_CHANNELS: u32 = 512;

    const CHANNEL_SHIFT: u32 = 3;
    const DEPTH_MASK: i32 = (1 << Self::CHANNEL_SHIFT) - 1;

    /// 8-bit unsigned, one channel.
    pub const CV_8UC1: MatType = MatType { depth: ElementType::U8, channels: 1 };
    /// 8-bit unsigned, three channels (B, G, R).
    pub const CV_8UC3: MatType = MatType { depth: ElementType::U8, channels: 3 };
    /// 16-bit unsigned, one channel.
    pub const CV_16UC1: MatType = MatType { depth: ElementType::U16, channels: 1 };
    /// 32-bit float, one channel.
    pub const CV_32FC1: MatType = MatType { depth: ElementType::F32, channels: 1 };

    /// Creates a matrix type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannels`] unless `1 <= channels <= 512`.
    pub fn new(depth: ElementType, channels: u32) -> Result<Self> {
        if channels == 0 || channels > Self::MAX_CHANNELS {
            return Err(Error::InvalidChannels { channels });
        }
        Ok(Self { depth, channels })
    }

    /// Element depth.
    #[inline]
    pub const fn depth(&self) -> ElementType {
        self.depth
    }

    /// Channels per pixel.
    #[inline]
    pub const fn channels(&self) -> u32 {
        self.channels
    }

    /// Bytes per pixel (all channels).
    #[inline]
    pub const fn pixel_size(&self) -> usize {
        self.depth.size() * self.channels as usize
    }

    /// Integer type code: `depth + ((channels - 1) << 3)`.
    #[inline]
    pub const fn code(&self) -> i32 {
        self.depth.code() + (((self.channels - 1) as i32) << Self::CHANNEL_SHIFT)
    }

    /// Decodes an integer type code.
    ///
    /// ```rust
    /// use cvbridge_core::MatType;
    ///
    /// assert_eq!(MatType::from_code(16).unwrap(), MatType::CV_8UC3);
    /// assert!(MatType::from_code(-1).is_err());
    /// ```
    pub fn from_code(code: i32) -> Result<Self> {
        let max_code = ((Self::MAX_CHANNELS as i32) << Self::CHANNEL_SHIFT) - 1;
        if !(0..=max_code).contains(&code) {
            return Err(Error::InvalidTypeCode { code });
        }
        let depth = ElementType::from_code(code & Self::DEPTH_MASK)
            .ok_or(Error::InvalidTypeCode { code })?;
        let channels = (code >> Self::CHANNEL_SHIFT) as u32 + 1;
        Self::new(depth, channels)
    }
}

impl fmt::Display for MatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CV_{}{}C{}",
            self.depth.bits(),
            self.depth.suffix(),
            self.channels
        )
    }
}

/// The four legal processor/matrix pairings.
pub const FORMAT_TABLE: [(PixelFormat, MatType); 4] = [
    (PixelFormat::Gray8, MatType::CV_8UC1),
    (PixelFormat::Rgb8, MatType::CV_8UC3),
    (PixelFormat::Gray16, MatType::CV_16UC1),
    (PixelFormat::GrayF32, MatType::CV_32FC1),
];

impl From<PixelFormat> for MatType {
    fn from(format: PixelFormat) -> Self {
        format.mat_type()
    }
}

impl TryFrom<MatType> for PixelFormat {
    type Error = Error;

    fn try_from(mat_type: MatType) -> Result<Self> {
        Self::for_mat_type(mat_type)
    }
}
