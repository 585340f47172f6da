//! ECB (Electronic Code Book) mode

use aes::{Aes128, Aes192, Aes256};
use ecb::cipher::block_padding::NoPadding;
use ecb::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit};

use crate::codec::BlockCipherCodec;
use crate::error::{CodecError, Result};
use crate::key::KeySize;

use super::ensure_aligned;

impl BlockCipherCodec {
    /// ECB mode encryption of an aligned buffer, in place.
    ///
    /// There is no chaining and no IV: identical plaintext blocks always
    /// produce identical ciphertext blocks.
    pub fn ecb_encrypt(key: &[u8], buf: &mut [u8]) -> Result<()> {
        ensure_aligned(buf)?;
        match KeySize::from_len(key.len())? {
            KeySize::Aes128 => encrypt::<Aes128>(key, buf),
            KeySize::Aes192 => encrypt::<Aes192>(key, buf),
            KeySize::Aes256 => encrypt::<Aes256>(key, buf),
        }
    }

    /// ECB mode decryption of an aligned buffer, in place.
    pub fn ecb_decrypt(key: &[u8], buf: &mut [u8]) -> Result<()> {
        ensure_aligned(buf)?;
        match KeySize::from_len(key.len())? {
            KeySize::Aes128 => decrypt::<Aes128>(key, buf),
            KeySize::Aes192 => decrypt::<Aes192>(key, buf),
            KeySize::Aes256 => decrypt::<Aes256>(key, buf),
        }
    }
}

fn encrypt<C>(key: &[u8], buf: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let len = buf.len();
    ecb::Encryptor::<C>::new_from_slice(key)
        .map_err(|_| CodecError::InvalidKeyLength(key.len()))?
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| CodecError::UnalignedBuffer(len))?;
    Ok(())
}

fn decrypt<C>(key: &[u8], buf: &mut [u8]) -> Result<()>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let len = buf.len();
    ecb::Decryptor::<C>::new_from_slice(key)
        .map_err(|_| CodecError::InvalidKeyLength(key.len()))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| CodecError::UnalignedBuffer(len))?;
    Ok(())
}
