//! AES-based PRG.

use crate::{aes::AesEncryptor, Block};
use rand::Rng;
use rand_core::{
    block::{BlockRng, BlockRngCore},
    CryptoRng, RngCore, SeedableRng,
};

/// Core of the PRG: AES-128 in counter mode.
#[derive(Clone)]
pub struct PrgCore {
    aes: AesEncryptor,
    state: u64,
}

impl BlockRngCore for PrgCore {
    type Item = u32;
    type Results = [u32; 4 * AesEncryptor::AES_BLOCK_COUNT];

    // Compute [AES(state)..AES(state+8)]
    #[inline]
    fn generate(&mut self, results: &mut Self::Results) {
        let mut blocks = [Block::ZERO; AesEncryptor::AES_BLOCK_COUNT].map(|_| {
            let x = self.state;
            self.state += 1;
            Block::new((x as u128).to_le_bytes())
        });
        self.aes.encrypt_blocks(&mut blocks);

        for (chunk, block) in results.chunks_exact_mut(4).zip(blocks) {
            for (word, bytes) in chunk.iter_mut().zip(block.to_bytes().chunks_exact(4)) {
                *word = u32::from_le_bytes(bytes.try_into().expect("chunk is 4 bytes"));
            }
        }
    }
}

impl SeedableRng for PrgCore {
    type Seed = Block;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            aes: AesEncryptor::new(seed),
            state: 0,
        }
    }
}

impl CryptoRng for PrgCore {}

/// An AES-CTR PRG seeded by a [`Block`].
///
/// Seeding from the same block always yields the same stream, starting from
/// the beginning; reseeding never continues a previous stream.
#[derive(Clone)]
pub struct Prg(BlockRng<PrgCore>);

impl RngCore for Prg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl SeedableRng for Prg {
    type Seed = <PrgCore as SeedableRng>::Seed;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        Prg(BlockRng::<PrgCore>::from_seed(seed))
    }
}

impl CryptoRng for Prg {}

impl Prg {
    /// Creates a Prg with a random seed.
    #[inline]
    pub fn new() -> Self {
        Prg::from_seed(rand::random::<[u8; 16]>().into())
    }

    /// Fills a byte slice with random values.
    #[inline]
    pub fn random_bytes(&mut self, buf: &mut [u8]) {
        self.fill_bytes(buf);
    }

    /// Fills a block slice with random block values.
    #[inline]
    pub fn random_blocks(&mut self, buf: &mut [Block]) {
        for block in buf {
            let mut bytes = [0u8; Block::LEN];
            self.fill_bytes(&mut bytes);
            *block = Block::new(bytes);
        }
    }

    /// Fills a bool slice with random bool values.
    #[inline]
    pub fn random_bools(&mut self, buf: &mut [bool]) {
        for b in buf {
            *b = self.gen();
        }
    }

    /// Generates a uniformly random packed bit matrix of the given
    /// dimensions, in column-major layout.
    ///
    /// Both dimensions must be multiples of 8.
    #[inline]
    pub fn random_bit_matrix(&mut self, rows: usize, cols: usize) -> Vec<u8> {
        let mut matrix = vec![0u8; rows * cols / 8];
        self.fill_bytes(&mut matrix);
        matrix
    }
}

impl Default for Prg {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prg_deterministic() {
        let seed = Block::new([3; 16]);

        let mut a = vec![Block::ZERO; 4];
        let mut b = vec![Block::ZERO; 4];
        Prg::from_seed(seed).random_blocks(&mut a);
        Prg::from_seed(seed).random_blocks(&mut b);

        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn test_prg_seed_separates() {
        let mut a = vec![Block::ZERO; 2];
        let mut b = vec![Block::ZERO; 2];
        Prg::from_seed(Block::ZERO).random_blocks(&mut a);
        Prg::from_seed(Block::ONES).random_blocks(&mut b);

        assert_ne!(a, b);
    }

    #[test]
    fn test_prg_reseed_restarts_stream() {
        let seed = Block::new([7; 16]);

        let mut prg = Prg::from_seed(seed);
        let mut first = vec![Block::ZERO; 2];
        prg.random_blocks(&mut first);

        // Drawing more does not affect a fresh stream from the same seed.
        let mut again = vec![Block::ZERO; 2];
        Prg::from_seed(seed).random_blocks(&mut again);

        assert_eq!(first, again);
    }
}
