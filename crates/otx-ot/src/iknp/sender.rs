use otx_core::{aes::FIXED_KEY_AES, bits, transpose::transpose, Block, Prg};
use rand::SeedableRng;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{base, io::BlockIo};

use super::{valid_extend_len, PublicParams, SenderError, BASE_LEN};

/// Obliviously transfers one block of each pair to the receiver.
///
/// The receiver obtains `m0[i]` where its i-th choice bit is 0 and `m1[i]`
/// where it is 1; the sender learns nothing about the choices.
///
/// # Arguments
///
/// * `io` - The channel to the receiver.
/// * `pp` - The public parameters.
/// * `m0` - The messages transferred for 0-choices.
/// * `m1` - The messages transferred for 1-choices.
pub fn send<Io: BlockIo>(
    io: &mut Io,
    pp: &PublicParams,
    m0: &[Block],
    m1: &[Block],
) -> Result<(), SenderError> {
    if m0.len() != m1.len() {
        return Err(SenderError::CountMismatch(m0.len(), m1.len()));
    }

    if !valid_extend_len(m0.len()) {
        return Err(SenderError::InvalidCount(m0.len()));
    }

    let (rows, s) = extend(io, pp, m0.len())?;

    let cipher = &(*FIXED_KEY_AES);

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = rows
                .par_chunks_exact(Block::LEN)
                .zip(m0.par_iter().zip(m1.par_iter()));
        } else {
            let iter = rows
                .chunks_exact(Block::LEN)
                .zip(m0.iter().zip(m1.iter()));
        }
    }

    let (outer0, outer1): (Vec<Block>, Vec<Block>) = iter
        .map(|(row, (m0, m1))| {
            let row = Block::try_from(row).expect("row is one block");
            (
                *m0 ^ cipher.cr_compress(&[row]),
                *m1 ^ cipher.cr_compress(&[row ^ s]),
            )
        })
        .unzip();

    io.send_blocks(&outer0)?;
    io.send_blocks(&outer1)?;
    io.flush()?;

    Ok(())
}

/// Obliviously transfers blocks which the receiver only learns at positions
/// where its choice bit is 1.
///
/// # Arguments
///
/// * `io` - The channel to the receiver.
/// * `pp` - The public parameters.
/// * `m` - The messages to transfer.
pub fn one_sided_send<Io: BlockIo>(
    io: &mut Io,
    pp: &PublicParams,
    m: &[Block],
) -> Result<(), SenderError> {
    if !valid_extend_len(m.len()) {
        return Err(SenderError::InvalidCount(m.len()));
    }

    let (rows, s) = extend(io, pp, m.len())?;

    let cipher = &(*FIXED_KEY_AES);

    for (row, m) in rows.chunks_exact(Block::LEN).zip(m) {
        let row = Block::try_from(row).expect("row is one block");
        io.send_block(*m ^ cipher.cr_compress(&[row ^ s]))?;
    }
    io.flush()?;

    Ok(())
}

/// Runs the extension phase, reconstructing the secret-shared matrix Q.
///
/// Returns the transposed matrix (one 128-bit row per packed 16-byte chunk)
/// together with the dense base-OT selection block `s`.
fn extend<Io: BlockIo>(
    io: &mut Io,
    pp: &PublicParams,
    count: usize,
) -> Result<(Vec<u8>, Block), SenderError> {
    let mut prg = Prg::new();

    let mut choices = vec![false; BASE_LEN];
    prg.random_bools(&mut choices);

    // Role inversion: the extension sender is the base-OT receiver, and
    // obtains one of the two column keys per column.
    let keys = base::receive(io, &pp.base, &choices)?;

    let col_width = count / 8;
    let col_blocks = count / Block::BITS;

    let mut q = vec![0u8; BASE_LEN * col_width];
    let mut c0 = vec![Block::ZERO; col_blocks];
    let mut c1 = vec![Block::ZERO; col_blocks];
    let mut pad = vec![Block::ZERO; col_blocks];

    for ((key, &choice), column) in keys
        .iter()
        .zip(&choices)
        .zip(q.chunks_exact_mut(col_width))
    {
        io.recv_blocks(&mut c0)?;
        io.recv_blocks(&mut c1)?;

        // The key selected via base OT decrypts exactly one of the two
        // column ciphertexts; the pad is a fresh stream per column key.
        Prg::from_seed(*key).random_blocks(&mut pad);

        let chosen = if choice { &c1 } else { &c0 };
        for ((chunk, ciphertext), pad) in column
            .chunks_exact_mut(Block::LEN)
            .zip(chosen)
            .zip(&pad)
        {
            chunk.copy_from_slice(&(*ciphertext ^ *pad).to_bytes());
        }
    }

    let mut rows = vec![0u8; q.len()];
    transpose(&q, count, BASE_LEN, &mut rows).expect("dimensions are multiples of 128");

    Ok((rows, bits::blocks_from_bits(&choices)[0]))
}
