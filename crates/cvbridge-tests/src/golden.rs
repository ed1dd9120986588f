//! Golden hash tests for conversion output.
//!
//! Each test builds a deterministic 64x48 input, converts it, and compares
//! the SHA256 of the output bytes against `golden/hashes.json`. The hashes
//! pin the exact byte layout (channel order, element width), so any change
//! to the conversion rules shows up here even when round trips still pass.
//!
//! Multi-byte outputs are hashed in little-endian order.
//!
//! ```bash
//! cargo test --package cvbridge-tests golden
//! ```

use sha2::{Digest, Sha256};
use std::collections::HashMap;

const GOLDEN_JSON: &str = include_str!("../golden/hashes.json");

#[derive(Debug, serde::Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    version: String,
    width: u32,
    height: u32,
    tests: HashMap<String, GoldenEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct GoldenEntry {
    hash: String,
    #[allow(dead_code)]
    description: Option<String>,
}

fn load_golden() -> GoldenData {
    serde_json::from_str(GOLDEN_JSON).expect("golden/hashes.json is valid")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Input generators
// ---------------------------------------------------------------------------

fn rgb_pattern(count: u32) -> Vec<u32> {
    (0..count)
        .map(|i| (((i * 7) & 0xFF) << 16) | (((i * 13) & 0xFF) << 8) | ((i * 29) & 0xFF))
        .collect()
}

fn bgr_byte_pattern(count: usize) -> Vec<u8> {
    (0..count * 3).map(|i| ((i * 31 + 7) & 0xFF) as u8).collect()
}

fn gray16_pattern(count: u32) -> Vec<u16> {
    (0..count).map(|i| ((i * 37) & 0xFFFF) as u16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvbridge_core::prelude::*;

    fn expected(golden: &GoldenData, name: &str) -> String {
        golden
            .tests
            .get(name)
            .unwrap_or_else(|| panic!("missing golden entry '{name}'"))
            .hash
            .clone()
    }

    #[test]
    fn test_golden_rgb8_to_matrix() {
        let golden = load_golden();
        let (w, h) = (golden.width, golden.height);
        let img = ProcessorImage::rgb8(w, h, rgb_pattern(w * h)).unwrap();

        for opts in [ConvertOptions::sequential(), ConvertOptions::default().with_min_parallel_pixels(1)] {
            let mat = processor_to_matrix_with(&img, &opts);
            assert_eq!(sha256_hex(mat.data()), expected(&golden, "rgb8_to_matrix"));
        }
    }

    #[test]
    fn test_golden_matrix_to_rgb8() {
        let golden = load_golden();
        let (w, h) = (golden.width, golden.height);
        let bytes = bgr_byte_pattern((w * h) as usize);
        let mat = MatrixImage::new(w, h, MatType::CV_8UC3, bytes).unwrap();

        let img = matrix_to_processor(&mat).unwrap();
        let le: Vec<u8> = img
            .data::<u32>()
            .unwrap()
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        assert_eq!(sha256_hex(&le), expected(&golden, "matrix_to_rgb8"));
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_golden_gray16_to_matrix() {
        let golden = load_golden();
        let (w, h) = (golden.width, golden.height);
        let img = ProcessorImage::gray16(w, h, gray16_pattern(w * h)).unwrap();

        let mat = processor_to_matrix(&img);
        assert_eq!(sha256_hex(mat.data()), expected(&golden, "gray16_to_matrix"));
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
