use cipher::{consts::U16, generic_array::GenericArray};
use core::ops::BitXor;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// A block of 128 bits.
///
/// Bit `k` of a block lives in byte `k / 8` at position `k % 8` (LSB0), so
/// the byte representation of a block doubles as a packed bit array.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block([u8; 16]);

impl Block {
    /// The length of a block in bytes.
    pub const LEN: usize = 16;
    /// The length of a block in bits.
    pub const BITS: usize = 128;
    /// A zero block.
    pub const ZERO: Self = Self([0; 16]);
    /// A block with all bits set to 1.
    pub const ONES: Self = Self([0xff; 16]);

    /// Creates a new block.
    #[inline]
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns the byte representation of the block.
    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Generates a random block using the provided RNG.
    #[inline]
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen())
    }

    /// Generates a random vector of blocks using the provided RNG.
    #[inline]
    pub fn random_vec<R: Rng + CryptoRng + ?Sized>(rng: &mut R, n: usize) -> Vec<Self> {
        (0..n).map(|_| rng.gen::<[u8; 16]>().into()).collect()
    }
}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Block::new(bytes)
    }
}

impl<'a> TryFrom<&'a [u8]> for Block {
    type Error = <[u8; 16] as TryFrom<&'a [u8]>>::Error;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(value).map(Self::from)
    }
}

impl From<Block> for [u8; 16] {
    #[inline]
    fn from(b: Block) -> Self {
        b.0
    }
}

impl AsRef<[u8]> for Block {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for Block {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl From<Block> for GenericArray<u8, U16> {
    #[inline]
    fn from(b: Block) -> Self {
        b.0.into()
    }
}

impl From<GenericArray<u8, U16>> for Block {
    #[inline]
    fn from(b: GenericArray<u8, U16>) -> Self {
        Block::new(b.into())
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        Self(std::array::from_fn(|i| self.0[i] ^ other.0[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor() {
        let a = Block::new([0x0f; 16]);
        let b = Block::new([0xf0; 16]);

        assert_eq!(a ^ b, Block::ONES);
        assert_eq!(a ^ a, Block::ZERO);
        assert_eq!(a ^ Block::ZERO, a);
    }

    #[test]
    fn test_byte_round_trip() {
        let bytes: [u8; 16] = std::array::from_fn(|i| i as u8);

        assert_eq!(Block::new(bytes).to_bytes(), bytes);
        assert_eq!(Block::try_from(bytes.as_slice()).unwrap(), Block::new(bytes));
    }
}
