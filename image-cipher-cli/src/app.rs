//! Executes commands against a key store and the output directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image_cipher::store::{load_material, save_material};
use image_cipher::{BlockCipherCodec, ByteGrid, KeyId, KeyMaterial, KeySize, KeyStore, Mode};
use tracing::info;

use crate::cli::Command;
use crate::raster::{self, Output};

pub struct App<S> {
    store: S,
    output_dir: PathBuf,
}

impl<S: KeyStore> App<S> {
    pub fn new(store: S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one command and return the message to show the user.
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        match command {
            Command::Keygen { mode, bits } => self.keygen(*mode, *bits),
            Command::Grayscale { input } => self.grayscale(input),
            Command::Encrypt { mode, bits, input } => self.encrypt(*mode, *bits, input),
            Command::Decrypt {
                mode,
                bits,
                input,
                crop,
            } => self.decrypt(*mode, *bits, input, *crop),
            Command::ListKeys { mode } => self.list_keys(*mode),
            Command::Menu => bail!("the menu cannot be nested"),
        }
    }

    fn keygen(&mut self, mode: Mode, size: KeySize) -> Result<String> {
        let material = KeyMaterial::generate(mode, size);
        let written = save_material(&mut self.store, &material).context("saving key material")?;
        info!(%mode, bits = size.bits(), "generated key");

        let upper = mode.as_str().to_uppercase();
        Ok(match written.as_slice() {
            [key, iv] => format!("{upper} key saved as {key} and IV saved as {iv}!"),
            _ => format!("{upper} key saved as {}!", KeyId::key(mode, size)),
        })
    }

    fn grayscale(&self, input: &Path) -> Result<String> {
        let image = load_input(input)?;
        let output = self.write(input, Output::Grayscale, &image)?;
        Ok(format!("Saved in grayscale {output}!"))
    }

    fn encrypt(&self, mode: Mode, size: KeySize, input: &Path) -> Result<String> {
        let image = load_input(input)?;
        let material = load_material(&self.store, mode, size)?;

        let encrypted = BlockCipherCodec::encrypt(&image, material.key(), mode, material.iv())?;
        let output = self.write(input, Output::Encrypted(mode, size), &encrypted)?;
        info!(input = %input.display(), %output, "encrypted image");

        Ok(format!(
            "Image encrypted with {} and saved as {output}!",
            mode.as_str().to_uppercase()
        ))
    }

    fn decrypt(
        &self,
        mode: Mode,
        size: KeySize,
        input: &Path,
        crop: Option<(usize, usize)>,
    ) -> Result<String> {
        let encrypted = load_input(input)?;
        let material = load_material(&self.store, mode, size)?;

        let mut decrypted =
            BlockCipherCodec::decrypt(&encrypted, material.key(), mode, material.iv())?;
        if let Some((height, width)) = crop {
            decrypted = decrypted.crop(height, width)?;
        }

        let output = self.write(input, Output::Decrypted(mode, size), &decrypted)?;
        info!(input = %input.display(), %output, "decrypted image");

        Ok(format!(
            "Image decrypted with {} and saved as {output}!",
            mode.as_str().to_uppercase()
        ))
    }

    fn list_keys(&self, mode: Mode) -> Result<String> {
        let keys = self.store.list(mode)?;
        if keys.is_empty() {
            return Ok(format!("No {mode}_key keys found!"));
        }

        let mut message = format!("Available {mode}_key keys:");
        for (i, id) in keys.iter().enumerate() {
            message.push_str(&format!("\n{}. {id}", i + 1));
        }
        Ok(message)
    }

    fn write(&self, input: &Path, output: Output, image: &ByteGrid) -> Result<String> {
        let name = output.file_name(input);
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;
        raster::save_grayscale(&self.output_dir.join(&name), image)?;
        Ok(name)
    }
}

fn load_input(input: &Path) -> Result<ByteGrid> {
    if !input.exists() {
        bail!("File not found: {}", input.display());
    }
    raster::load_grayscale(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_cipher::{CodecError, FsKeyStore, MemoryKeyStore, StoreError};

    fn write_image(dir: &Path, name: &str, grid: &ByteGrid) -> PathBuf {
        let path = dir.join(name);
        raster::save_grayscale(&path, grid).unwrap();
        path
    }

    fn sample() -> ByteGrid {
        ByteGrid::new(10, 21, (0..210).map(|i| i as u8).collect()).unwrap()
    }

    #[test]
    fn test_keygen_messages() {
        let mut app = App::new(MemoryKeyStore::new(), ".");

        let message = app
            .execute(&Command::Keygen {
                mode: Mode::Ecb,
                bits: KeySize::Aes128,
            })
            .unwrap();
        assert_eq!(message, "ECB key saved as ecb_key_128.bin!");

        let message = app
            .execute(&Command::Keygen {
                mode: Mode::Cbc,
                bits: KeySize::Aes256,
            })
            .unwrap();
        assert_eq!(
            message,
            "CBC key saved as cbc_key_256.bin and IV saved as cbc_iv_256.bin!"
        );
    }

    #[test]
    fn test_encrypt_then_decrypt_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut app = App::new(FsKeyStore::new(dir.path().join("keys")), &out);
        let input = write_image(dir.path(), "cat.png", &sample());

        for mode in Mode::ALL {
            app.execute(&Command::Keygen {
                mode,
                bits: KeySize::Aes192,
            })
            .unwrap();

            let message = app
                .execute(&Command::Encrypt {
                    mode,
                    bits: KeySize::Aes192,
                    input: input.clone(),
                })
                .unwrap();
            let encrypted_path = out.join(format!("cat_{mode}_192_encrypted.png"));
            assert!(message.ends_with(&format!("cat_{mode}_192_encrypted.png!")));

            let encrypted = raster::load_grayscale(&encrypted_path).unwrap();
            assert_eq!(encrypted.shape(), (16, 32));

            app.execute(&Command::Decrypt {
                mode,
                bits: KeySize::Aes192,
                input: encrypted_path,
                crop: None,
            })
            .unwrap();
            let decrypted = raster::load_grayscale(
                &out.join(format!("cat_{mode}_192_encrypted_{mode}_192_decrypted.png")),
            )
            .unwrap();
            assert_eq!(decrypted.shape(), (16, 32));
            assert_eq!(decrypted.crop(10, 21).unwrap(), sample());
        }
    }

    #[test]
    fn test_decrypt_with_crop() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = write_image(dir.path(), "cat.png", &sample());

        app.execute(&Command::Keygen {
            mode: Mode::Ecb,
            bits: KeySize::Aes128,
        })
        .unwrap();
        app.execute(&Command::Encrypt {
            mode: Mode::Ecb,
            bits: KeySize::Aes128,
            input,
        })
        .unwrap();
        app.execute(&Command::Decrypt {
            mode: Mode::Ecb,
            bits: KeySize::Aes128,
            input: dir.path().join("cat_ecb_128_encrypted.png"),
            crop: Some((10, 21)),
        })
        .unwrap();

        let decrypted =
            raster::load_grayscale(&dir.path().join("cat_ecb_128_encrypted_ecb_128_decrypted.png"))
                .unwrap();
        assert_eq!(decrypted, sample());
    }

    #[test]
    fn test_missing_key_and_iv() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = write_image(dir.path(), "cat.png", &sample());

        let err = app
            .execute(&Command::Encrypt {
                mode: Mode::Ecb,
                bits: KeySize::Aes128,
                input: input.clone(),
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::MissingKey(_))
        ));

        app.store
            .put(&KeyId::key(Mode::Cbc, KeySize::Aes128), &[1u8; 16])
            .unwrap();
        let err = app
            .execute(&Command::Encrypt {
                mode: Mode::Cbc,
                bits: KeySize::Aes128,
                input,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::MissingIv(_))
        ));
    }

    #[test]
    fn test_corrupt_key_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = write_image(dir.path(), "cat.png", &ByteGrid::zeros(16, 16));

        app.store
            .put(&KeyId::key(Mode::Ecb, KeySize::Aes128), &[1u8; 15])
            .unwrap();
        let err = app
            .execute(&Command::Decrypt {
                mode: Mode::Ecb,
                bits: KeySize::Aes128,
                input,
                crop: None,
            })
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CodecError>(),
            Some(&CodecError::InvalidKeyLength(15))
        );
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let err = app
            .execute(&Command::Grayscale {
                input: dir.path().join("nope.png"),
            })
            .unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_list_keys() {
        let mut app = App::new(MemoryKeyStore::new(), ".");
        assert_eq!(
            app.execute(&Command::ListKeys { mode: Mode::Cbc }).unwrap(),
            "No cbc_key keys found!"
        );

        for bits in [KeySize::Aes256, KeySize::Aes128] {
            app.execute(&Command::Keygen {
                mode: Mode::Cbc,
                bits,
            })
            .unwrap();
        }
        assert_eq!(
            app.execute(&Command::ListKeys { mode: Mode::Cbc }).unwrap(),
            "Available cbc_key keys:\n1. cbc_key_128.bin\n2. cbc_key_256.bin"
        );
    }
}
