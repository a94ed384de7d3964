//! An implementation of the Naor-Pinkas [`NP01`](https://dl.acm.org/doi/10.5555/365411.365502)
//! oblivious transfer protocol, used as the base OT seeding the extension.
//!
//! Semi-honest security only. The common reference point `C` lives in the
//! public parameters: the receiver proves knowledge of the discrete log of
//! at most one of `pk` and `C - pk`, so the sender's two messages remain
//! mutually exclusive.

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};

use otx_core::{Block, Prg};

use crate::io::BlockIo;

/// Public parameters of the Naor-Pinkas protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicParams {
    /// The common reference point `C`.
    pub c: RistrettoPoint,
}

impl PublicParams {
    /// The length of the serialized parameters in bytes.
    pub const LEN: usize = 32;

    /// Serializes the parameters as a compressed point.
    pub fn to_bytes(self) -> [u8; 32] {
        self.c.compress().to_bytes()
    }

    /// Deserializes parameters from a compressed point.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, BaseOtError> {
        CompressedRistretto(bytes)
            .decompress()
            .map(|c| Self { c })
            .ok_or(BaseOtError::InvalidPoint)
    }
}

/// Generates public parameters from fresh entropy.
pub fn setup() -> PublicParams {
    PublicParams {
        c: RistrettoPoint::random(&mut Prg::new()),
    }
}

/// Obliviously transfers one block of each pair to the receiver.
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
) -> Result<(), BaseOtError> {
    if m0.len() != m1.len() {
        return Err(BaseOtError::CountMismatch(m0.len(), m1.len()));
    }

    let mut prg = Prg::new();

    let mut keys = Vec::with_capacity(m0.len());
    for _ in 0..m0.len() {
        let pk0 = recv_point(io)?;
        keys.push((pk0, pp.c - pk0));
    }

    for (i, ((pk0, pk1), (m0, m1))) in keys.into_iter().zip(m0.iter().zip(m1)).enumerate() {
        let r = Scalar::random(&mut prg);
        send_point(io, &(&r * RISTRETTO_BASEPOINT_TABLE))?;
        io.send_blocks(&[
            *m0 ^ point_key(i as u128, &(pk0 * r)),
            *m1 ^ point_key(i as u128, &(pk1 * r)),
        ])?;
    }
    io.flush()?;

    Ok(())
}

/// Obliviously receives one block per pair, selected by the choice bits.
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
) -> Result<Vec<Block>, BaseOtError> {
    let mut prg = Prg::new();

    let mut secrets = Vec::with_capacity(choices.len());
    for &choice in choices {
        let k = Scalar::random(&mut prg);
        let pk = &k * RISTRETTO_BASEPOINT_TABLE;

        // The sender recovers the complementary key as C - pk0.
        let pk0 = if choice { pp.c - pk } else { pk };
        send_point(io, &pk0)?;
        secrets.push(k);
    }
    io.flush()?;

    let mut messages = Vec::with_capacity(choices.len());
    for (i, (&choice, k)) in choices.iter().zip(secrets).enumerate() {
        let rg = recv_point(io)?;
        let mut ciphertexts = [Block::ZERO; 2];
        io.recv_blocks(&mut ciphertexts)?;
        messages.push(ciphertexts[choice as usize] ^ point_key(i as u128, &(rg * k)));
    }

    Ok(messages)
}

/// Derives the symmetric key for transfer `i` from a shared ristretto point.
fn point_key(i: u128, point: &RistrettoPoint) -> Block {
    let mut input = [0u8; 48];
    input[..16].copy_from_slice(&i.to_le_bytes());
    input[16..].copy_from_slice(point.compress().as_bytes());

    let digest = blake3::hash(&input);
    Block::try_from(&digest.as_bytes()[..Block::LEN]).expect("digest prefix is one block")
}

fn send_point<Io: BlockIo>(io: &mut Io, point: &RistrettoPoint) -> std::io::Result<()> {
    let bytes = point.compress().to_bytes();
    io.send_blocks(&[
        Block::try_from(&bytes[..16]).expect("half a point is one block"),
        Block::try_from(&bytes[16..]).expect("half a point is one block"),
    ])
}

fn recv_point<Io: BlockIo>(io: &mut Io) -> Result<RistrettoPoint, BaseOtError> {
    let mut blocks = [Block::ZERO; 2];
    io.recv_blocks(&mut blocks)?;

    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(&blocks[0].to_bytes());
    bytes[16..].copy_from_slice(&blocks[1].to_bytes());
    CompressedRistretto(bytes)
        .decompress()
        .ok_or(BaseOtError::InvalidPoint)
}

/// Errors that can occur when running the base OT.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum BaseOtError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("count mismatch: m0 has {0} messages but m1 has {1}")]
    CountMismatch(usize, usize),
    #[error("received an invalid curve point encoding")]
    InvalidPoint,
}
