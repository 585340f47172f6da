//! Error types for codec and key store operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid key length {0} (must be 16, 24 or 32 bytes)")]
    InvalidKeyLength(usize),

    #[error("Invalid IV length (CBC requires exactly 16 bytes)")]
    InvalidIvLength(Option<usize>),

    #[error("Invalid key size {0} (must be 128, 192 or 256 bits)")]
    InvalidKeySize(u32),

    #[error("Buffer of {0} bytes is not aligned to the cipher block size")]
    UnalignedBuffer(usize),

    #[error("Buffer of {len} bytes does not match shape {height}x{width}")]
    ShapeMismatch {
        height: usize,
        width: usize,
        len: usize,
    },

    #[error("Unknown cipher mode {0:?} (expected ecb or cbc)")]
    UnknownMode(String),

    #[error("Cannot crop {from_height}x{from_width} grid to {height}x{width}")]
    CropOutOfBounds {
        from_height: usize,
        from_width: usize,
        height: usize,
        width: usize,
    },
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key file {0} not found")]
    MissingKey(String),

    #[error("IV file {0} not found")]
    MissingIv(String),
}
