//! Conversions between the two bit representations used by the protocols.
//!
//! Sparse form stores one bit per `bool`; packed form stores eight bits per
//! byte, LSB0. A [`Block`] is layout-compatible with 16 packed bytes, so the
//! packed form of a 128-bit column is exactly the byte representation of its
//! blocks. All conversions in this module (and the transpose) share the LSB0
//! convention, codified by the fixtures in the tests below.

use itybity::{FromBitIterator, ToBits};

use crate::Block;

/// Packs a sparse bit slice into blocks.
///
/// # Panics
///
/// Panics if the number of bits is not a multiple of 128.
pub fn blocks_from_bits(bits: &[bool]) -> Vec<Block> {
    assert_eq!(
        bits.len() % Block::BITS,
        0,
        "bit count must be a multiple of 128"
    );
    blocks_from_bytes(&Vec::<u8>::from_lsb0_iter(bits.iter().copied()))
}

/// Reinterprets packed bytes as blocks.
///
/// # Panics
///
/// Panics if the number of bytes is not a multiple of 16.
pub fn blocks_from_bytes(bytes: &[u8]) -> Vec<Block> {
    assert_eq!(
        bytes.len() % Block::LEN,
        0,
        "byte count must be a multiple of 16"
    );
    bytes
        .chunks_exact(Block::LEN)
        .map(|chunk| Block::try_from(chunk).expect("chunk is one block"))
        .collect()
}

/// Returns the packed byte representation of a block slice.
pub fn bytes_from_blocks(blocks: &[Block]) -> Vec<u8> {
    blocks.iter().flat_map(|block| block.to_bytes()).collect()
}

/// Writes the packed byte representation of a block slice into `out`.
///
/// # Panics
///
/// Panics if `out` is not exactly 16 bytes per block.
pub fn write_blocks(blocks: &[Block], out: &mut [u8]) {
    assert_eq!(out.len(), blocks.len() * Block::LEN, "output length mismatch");
    for (chunk, block) in out.chunks_exact_mut(Block::LEN).zip(blocks) {
        chunk.copy_from_slice(&block.to_bytes());
    }
}

/// Expands packed bytes into a sparse bit vector.
pub fn bits_from_bytes(bytes: &[u8]) -> Vec<bool> {
    bytes.iter_lsb0().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The repository-wide bit ordering: bit k of a packed byte array lives
    // in byte k/8 at position k%8.
    #[test]
    fn test_lsb0_fixture() {
        let bits = [
            true, true, false, false, false, false, false, false, // 3
            false, false, true, true, false, false, true, false, // 76
        ];
        let mut sparse = vec![false; 128];
        sparse[..16].copy_from_slice(&bits);

        let blocks = blocks_from_bits(&sparse);
        assert_eq!(blocks.len(), 1);

        let bytes = blocks[0].to_bytes();
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes[1], 76);
        assert_eq!(&bytes[2..], &[0; 14]);
    }

    #[test]
    fn test_sparse_round_trip() {
        let sparse: Vec<bool> = (0..256).map(|i| i % 3 == 0).collect();

        let blocks = blocks_from_bits(&sparse);
        assert_eq!(blocks.len(), 2);
        assert_eq!(bits_from_bytes(&bytes_from_blocks(&blocks)), sparse);
    }

    #[test]
    fn test_packed_round_trip() {
        let bytes: Vec<u8> = (0..32).collect();

        let blocks = blocks_from_bytes(&bytes);
        assert_eq!(bytes_from_blocks(&blocks), bytes);

        let mut out = vec![0u8; 32];
        write_blocks(&blocks, &mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    #[should_panic]
    fn test_ragged_bits_rejected() {
        let _ = blocks_from_bits(&[false; 100]);
    }
}
