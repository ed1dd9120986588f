//! Channel-order rule between packed RGB and interleaved B,G,R bytes.
//!
//! A processor `Rgb8` pixel is one `u32` with red in bits 16-23, green in
//! 8-15 and blue in 0-7. A 3-channel matrix pixel is three bytes in B, G, R
//! order. These helpers are the only place that rule is written down.
//!
//! ```rust
//! use cvbridge_core::layout::{pack_bgr, unpack_bgr};
//!
//! assert_eq!(pack_bgr([10, 20, 30]), 0x1E140A);
//! assert_eq!(unpack_bgr(0x102030), [0x30, 0x20, 0x10]);
//! ```

/// Bytes per interleaved B,G,R pixel.
pub const BGR_PIXEL_SIZE: usize = 3;

/// Packs one B,G,R byte triple into `(R << 16) | (G << 8) | B`.
#[inline(always)]
pub const fn pack_bgr(bgr: [u8; 3]) -> u32 {
    let [b, g, r] = bgr;
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a packed RGB value into B,G,R bytes. Bits 24-31 are ignored.
#[inline(always)]
pub const fn unpack_bgr(rgb: u32) -> [u8; 3] {
    [
        (rgb & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        ((rgb >> 16) & 0xFF) as u8,
    ]
}

/// Packs a span of interleaved B,G,R bytes into packed RGB values.
///
/// `src` must hold exactly `3 * dst.len()` bytes.
#[inline]
pub fn pack_bgr_slice(src: &[u8], dst: &mut [u32]) {
    debug_assert_eq!(src.len(), dst.len() * BGR_PIXEL_SIZE);
    for (px, out) in src.chunks_exact(BGR_PIXEL_SIZE).zip(dst.iter_mut()) {
        *out = pack_bgr([px[0], px[1], px[2]]);
    }
}

/// Unpacks a span of packed RGB values into interleaved B,G,R bytes.
///
/// `dst` must hold exactly `3 * src.len()` bytes.
#[inline]
pub fn unpack_bgr_slice(src: &[u32], dst: &mut [u8]) {
    debug_assert_eq!(dst.len(), src.len() * BGR_PIXEL_SIZE);
    for (&v, out) in src.iter().zip(dst.chunks_exact_mut(BGR_PIXEL_SIZE)) {
        out.copy_from_slice(&unpack_bgr(v));
    }
}
