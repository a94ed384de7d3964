//! Block-granular I/O over a reliable byte stream.

use std::io::{Read, Result, Write};

use otx_core::{bits, Block};

/// A bidirectional, reliable byte stream carrying 16-byte blocks.
///
/// Blocks travel on the wire as their raw bytes, in order, with no framing;
/// message lengths are implicit from the protocol state. Every method blocks
/// until the transfer completes and propagates the underlying I/O error
/// otherwise.
pub trait BlockIo {
    /// Sends a slice of blocks.
    fn send_blocks(&mut self, blocks: &[Block]) -> Result<()>;

    /// Receives blocks, filling the provided slice.
    fn recv_blocks(&mut self, blocks: &mut [Block]) -> Result<()>;

    /// Sends a single block.
    fn send_block(&mut self, block: Block) -> Result<()>;

    /// Receives a single block.
    fn recv_block(&mut self) -> Result<Block>;

    /// Flushes any buffered outgoing data.
    fn flush(&mut self) -> Result<()>;
}

impl<T: Read + Write> BlockIo for T {
    fn send_blocks(&mut self, blocks: &[Block]) -> Result<()> {
        let mut buf = vec![0u8; blocks.len() * Block::LEN];
        bits::write_blocks(blocks, &mut buf);
        self.write_all(&buf)
    }

    fn recv_blocks(&mut self, blocks: &mut [Block]) -> Result<()> {
        let mut buf = vec![0u8; blocks.len() * Block::LEN];
        self.read_exact(&mut buf)?;
        for (block, chunk) in blocks.iter_mut().zip(buf.chunks_exact(Block::LEN)) {
            *block = Block::try_from(chunk).expect("chunk is one block");
        }
        Ok(())
    }

    fn send_block(&mut self, block: Block) -> Result<()> {
        self.write_all(&block.to_bytes())
    }

    fn recv_block(&mut self) -> Result<Block> {
        let mut buf = [0u8; Block::LEN];
        self.read_exact(&mut buf)?;
        Ok(Block::new(buf))
    }

    fn flush(&mut self) -> Result<()> {
        Write::flush(self)
    }
}
