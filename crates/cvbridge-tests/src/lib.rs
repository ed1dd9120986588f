//! Integration tests for cvbridge crates.
//!
//! This crate exercises the public API end-to-end: round trips for every
//! format, concurrent use of the codec, the filter driver, and golden
//! hashes of the exact output layout.

#[cfg(test)]
mod golden;
