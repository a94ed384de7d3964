//! Fixed-key AES hashing.

use aes::Aes128Enc;
use cipher::{consts::U16, generic_array::GenericArray, BlockEncrypt, KeyInit};
use once_cell::sync::Lazy;

use crate::Block;

/// A fixed AES key (arbitrarily chosen).
pub const FIXED_KEY: [u8; 16] = [
    0x5b, 0xd1, 0x21, 0x8e, 0x17, 0xa3, 0x6c, 0x44, 0x90, 0x0f, 0xe2, 0x58, 0x7d, 0x3a, 0xc5, 0x76,
];

/// Fixed-key AES cipher.
pub static FIXED_KEY_AES: Lazy<FixedKeyAes> = Lazy::new(|| FixedKeyAes {
    aes: Aes128Enc::new_from_slice(&FIXED_KEY).expect("fixed key is 16 bytes"),
});

/// Fixed-key AES cipher.
pub struct FixedKeyAes {
    aes: Aes128Enc,
}

impl FixedKeyAes {
    #[inline]
    fn encrypt(&self, block: Block) -> Block {
        let mut buf: GenericArray<u8, U16> = block.into();
        self.aes.encrypt_block(&mut buf);
        buf.into()
    }

    /// Tweakable circular correlation-robust hash function instantiated
    /// using fixed-key AES.
    ///
    /// See <https://eprint.iacr.org/2019/074> (Section 7.4)
    ///
    /// `π(π(x) ⊕ i) ⊕ π(x)`, where `π` is instantiated using fixed-key AES.
    #[inline]
    pub fn tccr(&self, tweak: Block, block: Block) -> Block {
        let h1 = self.encrypt(block);
        let h2 = self.encrypt(h1 ^ tweak);
        h1 ^ h2
    }

    /// Compresses a vector of blocks into a single block, XOR-folding the
    /// index-tweaked hash of each element.
    ///
    /// For a single block this is `tccr(0, x)`.
    #[inline]
    pub fn cr_compress(&self, blocks: &[Block]) -> Block {
        blocks
            .iter()
            .enumerate()
            .fold(Block::ZERO, |digest, (i, block)| {
                digest ^ self.tccr(Block::new((i as u128).to_le_bytes()), *block)
            })
    }
}

/// A wrapper of AES, only for encryption.
#[derive(Clone)]
pub struct AesEncryptor(Aes128Enc);

impl AesEncryptor {
    /// Number of blocks encrypted per batch, always set to 8.
    pub const AES_BLOCK_COUNT: usize = 8;

    /// Initiates an AesEncryptor instance with key.
    #[inline]
    pub fn new(key: Block) -> Self {
        let key: [u8; 16] = key.into();
        AesEncryptor(Aes128Enc::new_from_slice(&key).expect("key is 16 bytes"))
    }

    /// Encrypts a slice of blocks in-place.
    #[inline]
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        for block in blocks {
            let mut buf: GenericArray<u8, U16> = (*block).into();
            self.0.encrypt_block(&mut buf);
            *block = buf.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tccr_tweak_separates() {
        let cipher = &(*FIXED_KEY_AES);

        let x = Block::new([42; 16]);
        let h0 = cipher.tccr(Block::ZERO, x);
        let h1 = cipher.tccr(Block::ONES, x);

        assert_ne!(h0, h1);
        assert_ne!(h0, x);
        // Deterministic under the fixed key.
        assert_eq!(h0, cipher.tccr(Block::ZERO, x));
    }

    #[test]
    fn test_cr_compress_single_block() {
        let cipher = &(*FIXED_KEY_AES);

        let x = Block::new([7; 16]);
        assert_eq!(cipher.cr_compress(&[x]), cipher.tccr(Block::ZERO, x));
    }

    #[test]
    fn test_cr_compress_order_sensitive() {
        let cipher = &(*FIXED_KEY_AES);

        let x = Block::new([1; 16]);
        let y = Block::new([2; 16]);

        assert_ne!(cipher.cr_compress(&[x, y]), cipher.cr_compress(&[y, x]));
    }

    #[test]
    fn test_encryptor_keys_separate() {
        let aes0 = AesEncryptor::new(Block::ZERO);
        let aes1 = AesEncryptor::new(Block::ONES);

        let mut blocks0 = [Block::ZERO; 2];
        let mut blocks1 = [Block::ZERO; 2];
        aes0.encrypt_blocks(&mut blocks0);
        aes1.encrypt_blocks(&mut blocks1);

        assert_eq!(blocks0[0], blocks0[1]);
        assert_ne!(blocks0[0], blocks1[0]);
    }
}
