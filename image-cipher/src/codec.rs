//! Grid-level encryption and decryption

use tracing::debug;

use crate::error::{CodecError, Result};
use crate::grid::ByteGrid;
use crate::key::{KeySize, IV_LEN};
use crate::modes::Mode;
use crate::padding::pad;

/// Stateless AES codec over [`ByteGrid`]s in ECB or CBC mode.
///
/// Key and IV are borrowed for a single call. Nothing is cached between calls.
pub struct BlockCipherCodec;

impl BlockCipherCodec {
    /// Check key and IV before any cryptographic work.
    ///
    /// The key must be 16, 24 or 32 bytes. CBC additionally needs a 16 byte IV;
    /// ECB ignores any IV it is given.
    pub fn validate(key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<KeySize> {
        let size = KeySize::from_len(key.len())?;
        if mode.requires_iv() && iv.map(<[u8]>::len) != Some(IV_LEN) {
            return Err(CodecError::InvalidIvLength(iv.map(<[u8]>::len)));
        }
        Ok(size)
    }

    /// Pad `image` to the block size and encrypt it.
    ///
    /// The ciphertext has the padded shape. Its samples are cipher output and
    /// carry no image meaning.
    pub fn encrypt(image: &ByteGrid, key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<ByteGrid> {
        let size = Self::validate(key, mode, iv)?;

        let padded = pad(image);
        let (height, width) = padded.shape();
        let mut data = padded.into_bytes();
        Self::apply(Direction::Encrypt, key, mode, iv, &mut data)?;

        debug!(
            %mode,
            bits = size.bits(),
            from = ?image.shape(),
            to = ?(height, width),
            "encrypted grid"
        );
        Ok(ByteGrid::from_parts(height, width, data))
    }

    /// Decrypt `ciphertext`, keeping its shape.
    ///
    /// Padding added at encryption time is not removed, and a wrong key is not
    /// detected: it yields garbage samples.
    pub fn decrypt(
        ciphertext: &ByteGrid,
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
    ) -> Result<ByteGrid> {
        let size = Self::validate(key, mode, iv)?;

        let (height, width) = ciphertext.shape();
        let mut data = ciphertext.as_bytes().to_vec();
        Self::apply(Direction::Decrypt, key, mode, iv, &mut data)?;

        debug!(%mode, bits = size.bits(), shape = ?(height, width), "decrypted grid");
        Ok(ByteGrid::from_parts(height, width, data))
    }

    fn apply(
        direction: Direction,
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
        data: &mut [u8],
    ) -> Result<()> {
        match (mode, direction) {
            (Mode::Ecb, Direction::Encrypt) => Self::ecb_encrypt(key, data),
            (Mode::Ecb, Direction::Decrypt) => Self::ecb_decrypt(key, data),
            (Mode::Cbc, direction) => {
                let iv = iv.ok_or(CodecError::InvalidIvLength(None))?;
                match direction {
                    Direction::Encrypt => Self::cbc_encrypt(key, iv, data),
                    Direction::Decrypt => Self::cbc_decrypt(key, iv, data),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}
