//! Memory model for frozen snapshots
//!
//! This module provides the core memory abstractions:
//! - [`image`]: Mapped byte regions with initialization tracking and tombstones
//! - [`value`]: Typed views ([`value::Value`], [`value::Pointer`]) and decoded
//!   [`value::Scalar`]s
//!
//! # Byte Order
//!
//! Multi-byte scalars and pointers are little-endian, matching the x86-64 and
//! AArch64 targets libstdc++ layouts are described for.
//!
//! # Pointer Arithmetic
//!
//! Pointer arithmetic is scaled by pointee size:
//! ```text
//! ptr + n  →  ptr + (n * sizeof(*ptr))
//! ```

pub mod image;
pub mod value;

/// Assemble a little-endian unsigned integer from up to 8 bytes
pub fn le_uint(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (i * 8)))
}

/// Encode the low `size` bytes of a value as little-endian
pub fn le_bytes(value: u64, size: usize) -> Vec<u8> {
    value.to_le_bytes()[..size.min(8)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_round_trip_sizes() {
        assert_eq!(le_uint(&[0x34, 0x12]), 0x1234);
        assert_eq!(le_bytes(0x1234, 2), vec![0x34, 0x12]);
        assert_eq!(le_bytes(u64::MAX, 4), vec![0xff; 4]);
    }
}
