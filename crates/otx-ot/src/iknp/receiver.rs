use otx_core::{aes::FIXED_KEY_AES, bits, transpose::transpose, Block, Prg};
use rand::SeedableRng;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{base, io::BlockIo};

use super::{valid_extend_len, PublicParams, ReceiverError, BASE_LEN};

/// Obliviously receives one block per pair, selected by the choice bits.
///
/// Returns `m0[i]` where `choices[i]` is 0 and `m1[i]` where it is 1.
///
/// # Arguments
///
/// * `io` - The channel to the sender.
/// * `pp` - The public parameters.
/// * `choices` - The receiver's choice bits.
pub fn receive<Io: BlockIo>(
    io: &mut Io,
    pp: &PublicParams,
    choices: &[bool],
) -> Result<Vec<Block>, ReceiverError> {
    if !valid_extend_len(choices.len()) {
        return Err(ReceiverError::InvalidCount(choices.len()));
    }

    let count = choices.len();
    let rows = extend(io, pp, choices)?;

    let mut outer0 = vec![Block::ZERO; count];
    let mut outer1 = vec![Block::ZERO; count];
    io.recv_blocks(&mut outer0)?;
    io.recv_blocks(&mut outer1)?;

    let cipher = &(*FIXED_KEY_AES);

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = rows
                .par_chunks_exact(Block::LEN)
                .zip(choices.par_iter())
                .zip(outer0.par_iter().zip(outer1.par_iter()));
        } else {
            let iter = rows
                .chunks_exact(Block::LEN)
                .zip(choices.iter())
                .zip(outer0.iter().zip(outer1.iter()));
        }
    }

    let result = iter
        .map(|((row, &choice), (c0, c1))| {
            let row = Block::try_from(row).expect("row is one block");
            let outer = if choice { *c1 } else { *c0 };
            outer ^ cipher.cr_compress(&[row])
        })
        .collect();

    Ok(result)
}

/// Obliviously receives the blocks at positions where the choice bit is 1.
///
/// Returns the received blocks in ascending position order; the length of
/// the result is the Hamming weight of `choices`.
///
/// # Arguments
///
/// * `io` - The channel to the sender.
/// * `pp` - The public parameters.
/// * `choices` - The receiver's choice bits.
pub fn one_sided_receive<Io: BlockIo>(
    io: &mut Io,
    pp: &PublicParams,
    choices: &[bool],
) -> Result<Vec<Block>, ReceiverError> {
    if !valid_extend_len(choices.len()) {
        return Err(ReceiverError::InvalidCount(choices.len()));
    }

    let rows = extend(io, pp, choices)?;

    let cipher = &(*FIXED_KEY_AES);

    let mut result = Vec::new();
    for (row, &choice) in rows.chunks_exact(Block::LEN).zip(choices) {
        let outer = io.recv_block()?;

        // Only positions with a set choice bit decrypt; the rest stay hidden.
        if choice {
            let row = Block::try_from(row).expect("row is one block");
            result.push(outer ^ cipher.cr_compress(&[row]));
        }
    }

    Ok(result)
}

/// Runs the extension phase, secret-sharing the random matrix T.
///
/// Returns the transposed matrix, one 128-bit row per packed 16-byte chunk.
fn extend<Io: BlockIo>(
    io: &mut Io,
    pp: &PublicParams,
    choices: &[bool],
) -> Result<Vec<u8>, ReceiverError> {
    let count = choices.len();
    let mut prg = Prg::new();

    let t = prg.random_bit_matrix(count, BASE_LEN);
    let k0 = Block::random_vec(&mut prg, BASE_LEN);
    let k1 = Block::random_vec(&mut prg, BASE_LEN);

    // Role inversion: the extension receiver is the base-OT sender, and
    // hands the sender one of the two column keys per column.
    base::send(io, &pp.base, &k0, &k1)?;

    let r = bits::blocks_from_bits(choices);

    let col_width = count / 8;
    let mut ciphertext = vec![Block::ZERO; count / Block::BITS];
    let mut pad = vec![Block::ZERO; count / Block::BITS];

    for ((k0, k1), column) in k0.iter().zip(&k1).zip(t.chunks_exact(col_width)) {
        let m0 = bits::blocks_from_bytes(column);

        // C0 encrypts the column of T under k0, C1 the column of T ⊕ R
        // under k1; each pad is a fresh stream per column key.
        Prg::from_seed(*k0).random_blocks(&mut pad);
        for ((ciphertext, m), pad) in ciphertext.iter_mut().zip(&m0).zip(&pad) {
            *ciphertext = *m ^ *pad;
        }
        io.send_blocks(&ciphertext)?;

        Prg::from_seed(*k1).random_blocks(&mut pad);
        for (((ciphertext, m), pad), r) in ciphertext.iter_mut().zip(&m0).zip(&pad).zip(&r) {
            *ciphertext = *m ^ *r ^ *pad;
        }
        io.send_blocks(&ciphertext)?;
    }
    io.flush()?;

    let mut rows = vec![0u8; t.len()];
    transpose(&t, count, BASE_LEN, &mut rows).expect("dimensions are multiples of 128");

    Ok(rows)
}
