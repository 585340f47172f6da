//! Cipher modes of operation
//!
//! Both modes delegate the block transform to AES and the block chaining to
//! the RustCrypto mode crates. Buffers must already be aligned to
//! [`BLOCK_SIZE`](crate::padding::BLOCK_SIZE); no padding scheme is applied here.

pub mod cbc;
pub mod ecb;

use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};
use crate::padding::BLOCK_SIZE;

/// Block cipher mode of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Electronic Code Book: blocks are transformed independently.
    Ecb,
    /// Cipher Block Chaining: each block is XORed with the previous ciphertext block.
    Cbc,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Ecb, Mode::Cbc];

    pub fn requires_iv(self) -> bool {
        matches!(self, Mode::Cbc)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ecb => "ecb",
            Mode::Cbc => "cbc",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ecb" => Ok(Mode::Ecb),
            "cbc" => Ok(Mode::Cbc),
            _ => Err(CodecError::UnknownMode(s.to_string())),
        }
    }
}

fn ensure_aligned(buf: &[u8]) -> Result<()> {
    if buf.len() % BLOCK_SIZE != 0 {
        return Err(CodecError::UnalignedBuffer(buf.len()));
    }
    Ok(())
}
