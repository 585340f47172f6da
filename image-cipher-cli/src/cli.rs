//! Command-line arguments and the command type shared with the menu.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image_cipher::{KeySize, Mode};

/// Encrypt grayscale images with AES in ECB or CBC mode.
#[derive(Parser, Debug)]
#[command(name = "image-cipher", version)]
pub struct Cli {
    /// Directory holding `{mode}_key_{bits}.bin` and `cbc_iv_{bits}.bin` files
    #[arg(long, env = "IMAGE_CIPHER_KEY_DIR", default_value = ".")]
    pub key_dir: PathBuf,

    /// Directory that receives grayscale, encrypted and decrypted images
    #[arg(long, env = "IMAGE_CIPHER_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "IMAGE_CIPHER_LOG", default_value = "warn")]
    pub log_level: String,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a random key, plus an IV for CBC, into the key directory
    Keygen {
        #[arg(short, long)]
        mode: Mode,

        /// Key size in bits (128, 192 or 256)
        #[arg(short, long, value_parser = parse_key_size)]
        bits: KeySize,
    },

    /// Save an image as 8-bit grayscale PNG
    Grayscale { input: PathBuf },

    /// Encrypt an image with a stored key
    Encrypt {
        #[arg(short, long)]
        mode: Mode,

        #[arg(short, long, value_parser = parse_key_size)]
        bits: KeySize,

        input: PathBuf,
    },

    /// Decrypt an encrypted image with a stored key
    Decrypt {
        #[arg(short, long)]
        mode: Mode,

        #[arg(short, long, value_parser = parse_key_size)]
        bits: KeySize,

        input: PathBuf,

        /// Original HEIGHTxWIDTH; strips the block padding from the result
        #[arg(long, value_parser = parse_shape)]
        crop: Option<(usize, usize)>,
    },

    /// List stored keys for a mode
    ListKeys {
        #[arg(short, long)]
        mode: Mode,
    },

    /// Interactive menu
    Menu,
}

fn parse_key_size(s: &str) -> Result<KeySize, String> {
    let bits: u32 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    KeySize::from_bits(bits).map_err(|e| e.to_string())
}

fn parse_shape(s: &str) -> Result<(usize, usize), String> {
    let (height, width) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("{s:?} is not HEIGHTxWIDTH"))?;
    let height = height.trim().parse().map_err(|_| format!("bad height in {s:?}"))?;
    let width = width.trim().parse().map_err(|_| format!("bad width in {s:?}"))?;
    Ok((height, width))
}
