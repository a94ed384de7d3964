//! Oblivious transfer protocols over synchronous, block-granular I/O.
//!
//! The [`iknp`] module implements the IKNP oblivious transfer extension:
//! from 128 base oblivious transfers (the Naor-Pinkas protocol in [`base`]),
//! it produces an arbitrary multiple of 128 1-out-of-2 transfers on 128-bit
//! messages using only symmetric primitives. The two parties communicate
//! through the [`io::BlockIo`] trait, a lock-step stream of raw 16-byte
//! blocks with no added framing.
#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod base;
pub mod iknp;
pub mod io;
