//! # Image Cipher Library
//!
//! Encrypts grayscale raster buffers with AES in ECB or CBC mode.
//!
//! ## Pipeline
//!
//! - [`padding::pad`] extends a [`ByteGrid`] with zero rows and columns so both
//!   dimensions are multiples of the 16 byte block size
//! - [`BlockCipherCodec`] validates key and IV lengths, then runs the AES
//!   primitive over the flattened grid and reshapes the result
//! - [`store`] persists generated [`KeyMaterial`] under a key/IV naming scheme
//!
//! Decryption keeps the padded shape. The original dimensions are not
//! recorded anywhere; [`ByteGrid::crop`] strips the margin when the caller
//! knows them.
//!
//! ## Usage
//!
//! ```rust
//! use image_cipher::{BlockCipherCodec, ByteGrid, KeyMaterial, KeySize, Mode};
//!
//! let image = ByteGrid::zeros(10, 10);
//! let material = KeyMaterial::generate(Mode::Cbc, KeySize::Aes128);
//!
//! let encrypted = BlockCipherCodec::encrypt(&image, material.key(), Mode::Cbc, material.iv())?;
//! assert_eq!(encrypted.shape(), (16, 16));
//!
//! let decrypted = BlockCipherCodec::decrypt(&encrypted, material.key(), Mode::Cbc, material.iv())?;
//! assert_eq!(decrypted.crop(10, 10)?, image);
//! # Ok::<(), image_cipher::CodecError>(())
//! ```
//!
//! ECB is provided because it makes block structure visible in the output,
//! not because it is safe. Neither mode authenticates the ciphertext.

pub mod codec;
pub mod error;
pub mod grid;
pub mod key;
pub mod modes;
pub mod padding;
pub mod store;

pub use codec::BlockCipherCodec;
pub use error::{CodecError, Result, StoreError};
pub use grid::ByteGrid;
pub use key::{KeyMaterial, KeySize, IV_LEN};
pub use modes::Mode;
pub use padding::{pad, BLOCK_SIZE};
pub use store::{FsKeyStore, KeyId, KeyKind, KeyStore, MemoryKeyStore};
