//! CBC (Cipher Block Chaining) mode

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};

use crate::codec::BlockCipherCodec;
use crate::error::{CodecError, Result};
use crate::key::{KeySize, IV_LEN};

use super::ensure_aligned;

impl BlockCipherCodec {
    /// CBC mode encryption of an aligned buffer, in place.
    ///
    /// C_0 = E(K, P_0 ⊕ IV), C_i = E(K, P_i ⊕ C_{i-1})
    pub fn cbc_encrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()> {
        ensure_iv(iv)?;
        ensure_aligned(buf)?;
        match KeySize::from_len(key.len())? {
            KeySize::Aes128 => encrypt::<Aes128>(key, iv, buf),
            KeySize::Aes192 => encrypt::<Aes192>(key, iv, buf),
            KeySize::Aes256 => encrypt::<Aes256>(key, iv, buf),
        }
    }

    /// CBC mode decryption of an aligned buffer, in place.
    ///
    /// P_i = D(K, C_i) ⊕ C_{i-1}, with C_{-1} = IV
    pub fn cbc_decrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()> {
        ensure_iv(iv)?;
        ensure_aligned(buf)?;
        match KeySize::from_len(key.len())? {
            KeySize::Aes128 => decrypt::<Aes128>(key, iv, buf),
            KeySize::Aes192 => decrypt::<Aes192>(key, iv, buf),
            KeySize::Aes256 => decrypt::<Aes256>(key, iv, buf),
        }
    }
}

fn ensure_iv(iv: &[u8]) -> Result<()> {
    if iv.len() != IV_LEN {
        return Err(CodecError::InvalidIvLength(Some(iv.len())));
    }
    Ok(())
}

fn encrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let len = buf.len();
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CodecError::InvalidKeyLength(key.len()))?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| CodecError::UnalignedBuffer(len))?;
    Ok(())
}

fn decrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let len = buf.len();
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CodecError::InvalidKeyLength(key.len()))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| CodecError::UnalignedBuffer(len))?;
    Ok(())
}
