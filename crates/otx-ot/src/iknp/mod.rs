//! An implementation of the [`IKNP`](https://www.iacr.org/archive/crypto2003/27290145/27290145.pdf)
//! oblivious transfer extension protocol, with the optimizations of
//! [`ALSZ13`](https://eprint.iacr.org/2013/552.pdf).
//!
//! The protocol turns [`BASE_LEN`] base oblivious transfers into any
//! multiple of 128 transfers on 128-bit messages. The extension sender
//! plays the *receiver* role of the base OT and vice versa; this inversion
//! is essential to the construction. Security is passive: the `malicious`
//! flag in [`PublicParams`] is carried for forward compatibility and never
//! branched on.

mod error;
mod receiver;
mod sender;

pub use error::{ParamsError, ReceiverError, SenderError};
pub use receiver::{one_sided_receive, receive};
pub use sender::{one_sided_send, send};

use std::{fs, path::Path};

use crate::base;

/// Number of base OTs, and the width of the extension matrix.
pub const BASE_LEN: usize = 128;

/// Public parameters of the extension protocol.
///
/// Read-only after [`setup`]; both parties must hold the same parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicParams {
    /// Whether the parameters were generated for a maliciously-secure
    /// variant. Unused by this protocol.
    pub malicious: bool,
    /// The base-OT public parameters.
    pub base: base::PublicParams,
}

/// Generates public parameters from fresh entropy.
pub fn setup() -> PublicParams {
    PublicParams {
        malicious: false,
        base: base::setup(),
    }
}

impl PublicParams {
    /// Saves the parameters to a file.
    ///
    /// The encoding is the serialized base-OT parameters followed by a
    /// single `malicious` byte; [`PublicParams::load`] is its exact inverse.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let mut bytes = Vec::with_capacity(base::PublicParams::LEN + 1);
        bytes.extend_from_slice(&self.base.to_bytes());
        bytes.push(self.malicious as u8);
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads parameters from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let bytes = fs::read(path)?;
        if bytes.len() != base::PublicParams::LEN + 1 {
            return Err(ParamsError::MalformedEncoding);
        }

        let point: [u8; 32] = bytes[..base::PublicParams::LEN]
            .try_into()
            .expect("length was checked");
        let base = base::PublicParams::from_bytes(point)
            .map_err(|_| ParamsError::MalformedEncoding)?;

        let malicious = match bytes[base::PublicParams::LEN] {
            0 => false,
            1 => true,
            _ => return Err(ParamsError::MalformedEncoding),
        };

        Ok(Self { malicious, base })
    }
}

/// An extension length is valid if it is a non-zero multiple of the base
/// OT count.
pub(crate) fn valid_extend_len(count: usize) -> bool {
    count != 0 && count % BASE_LEN == 0
}
