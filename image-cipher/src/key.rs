//! AES key sizes and generated key material

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CodecError, Result};
use crate::modes::Mode;

/// CBC initialization vector length in bytes
pub const IV_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            128 => Ok(KeySize::Aes128),
            192 => Ok(KeySize::Aes192),
            256 => Ok(KeySize::Aes256),
            _ => Err(CodecError::InvalidKeySize(bits)),
        }
    }

    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            _ => Err(CodecError::InvalidKeyLength(len)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            KeySize::Aes128 => 128,
            KeySize::Aes192 => 192,
            KeySize::Aes256 => 256,
        }
    }

    /// Key length in bytes
    pub fn len(self) -> usize {
        self.bits() as usize / 8
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// A key, plus its IV for CBC, as generated or as read back from a store.
///
/// Lengths are not re-checked on load: the codec validates them on use.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub mode: Mode,
    pub size: KeySize,
    key: Vec<u8>,
    iv: Option<Vec<u8>>,
}

impl KeyMaterial {
    /// Draw a fresh key (and IV for CBC) from the operating system CSPRNG.
    pub fn generate(mode: Mode, size: KeySize) -> Self {
        let mut key = vec![0u8; size.len()];
        OsRng.fill_bytes(&mut key);

        let iv = mode.requires_iv().then(|| {
            let mut iv = vec![0u8; IV_LEN];
            OsRng.fill_bytes(&mut iv);
            iv
        });

        Self {
            mode,
            size,
            key,
            iv,
        }
    }

    pub fn from_stored(mode: Mode, size: KeySize, key: Vec<u8>, iv: Option<Vec<u8>>) -> Self {
        Self {
            mode,
            size,
            key,
            iv,
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("mode", &self.mode)
            .field("size", &self.size)
            .field("key", &"[REDACTED]")
            .field("iv", &self.iv.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
