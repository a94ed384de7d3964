//! Packed bit-matrix transpose.

use thiserror::Error;

/// Transposes a packed bit matrix.
///
/// `src` is a column-major `rows x cols` bit matrix: element `(r, j)` lives
/// in byte `j * rows / 8 + r / 8` at bit `r % 8`. `dst` receives the
/// column-major `cols x rows` transpose.
///
/// Both dimensions must be multiples of 8, and both slices must hold exactly
/// `rows * cols / 8` bytes.
pub fn transpose(src: &[u8], rows: usize, cols: usize, dst: &mut [u8]) -> Result<(), TransposeError> {
    if rows % 8 != 0 || cols % 8 != 0 || rows == 0 || cols == 0 {
        return Err(TransposeError::InvalidDimensions { rows, cols });
    }

    if src.len() != rows * cols / 8 || dst.len() != src.len() {
        return Err(TransposeError::MalformedSlice);
    }

    let src_stride = rows / 8;
    let dst_stride = cols / 8;

    // 8x8 bit tiles: the tile at (8*rb.., 8*jb..) of the source lands
    // transposed at (8*jb.., 8*rb..) of the destination.
    for jb in 0..dst_stride {
        for rb in 0..src_stride {
            let mut tile = [0u8; 8];
            for (k, byte) in tile.iter_mut().enumerate() {
                *byte = src[(jb * 8 + k) * src_stride + rb];
            }

            let tile = transpose_8x8(u64::from_le_bytes(tile)).to_le_bytes();

            for (k, byte) in tile.iter().enumerate() {
                dst[(rb * 8 + k) * dst_stride + jb] = *byte;
            }
        }
    }

    Ok(())
}

// Transposes an 8x8 bit matrix packed into a u64, little-endian, LSB0:
// element (r, c) at bit 8r + c. Three rounds of delta swaps exchanging
// 1x1, 2x2 and 4x4 sub-blocks.
#[inline]
fn transpose_8x8(mut x: u64) -> u64 {
    let mut t = (x ^ (x >> 7)) & 0x00aa00aa00aa00aa;
    x ^= t ^ (t << 7);
    t = (x ^ (x >> 14)) & 0x0000cccc0000cccc;
    x ^= t ^ (t << 14);
    t = (x ^ (x >> 28)) & 0x00000000f0f0f0f0;
    x ^= t ^ (t << 28);
    x
}

/// Errors that can occur when transposing a bit matrix.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TransposeError {
    #[error("dimensions must be non-zero multiples of 8: {rows} x {cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("slice length does not match the matrix dimensions")]
    MalformedSlice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    fn get_bit(matrix: &[u8], rows: usize, r: usize, j: usize) -> bool {
        matrix[j * rows / 8 + r / 8] >> (r % 8) & 1 == 1
    }

    fn set_bit(matrix: &mut [u8], rows: usize, r: usize, j: usize) {
        matrix[j * rows / 8 + r / 8] |= 1 << (r % 8);
    }

    fn transpose_naive(src: &[u8], rows: usize, cols: usize) -> Vec<u8> {
        let mut dst = vec![0u8; src.len()];
        for j in 0..cols {
            for r in 0..rows {
                if get_bit(src, rows, r, j) {
                    set_bit(&mut dst, cols, j, r);
                }
            }
        }
        dst
    }

    #[test]
    fn test_transpose_matches_naive() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        for (rows, cols) in [(8, 8), (64, 32), (128, 128), (256, 128)] {
            let src: Vec<u8> = (0..rows * cols / 8).map(|_| rng.gen()).collect();

            let mut dst = vec![0u8; src.len()];
            transpose(&src, rows, cols, &mut dst).unwrap();

            assert_eq!(dst, transpose_naive(&src, rows, cols), "{rows}x{cols}");
        }
    }

    #[test]
    fn test_transpose_involution() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let (rows, cols) = (512, 128);
        let src: Vec<u8> = (0..rows * cols / 8).map(|_| rng.gen()).collect();

        let mut once = vec![0u8; src.len()];
        let mut twice = vec![0u8; src.len()];
        transpose(&src, rows, cols, &mut once).unwrap();
        transpose(&once, cols, rows, &mut twice).unwrap();

        assert_eq!(twice, src);
    }

    #[test]
    fn test_transpose_rejects_bad_dimensions() {
        let mut dst = vec![0u8; 4];
        assert_eq!(
            transpose(&[0u8; 4], 4, 8, &mut dst),
            Err(TransposeError::InvalidDimensions { rows: 4, cols: 8 })
        );

        let mut dst = vec![0u8; 16];
        assert_eq!(
            transpose(&[0u8; 8], 8, 16, &mut dst),
            Err(TransposeError::MalformedSlice)
        );
    }
}
