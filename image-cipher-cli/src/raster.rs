//! Grayscale raster load/save and output file naming.

use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat};
use image_cipher::{ByteGrid, KeySize, Mode};

/// Load any readable image as an 8-bit grayscale grid.
pub fn load_grayscale(path: &Path) -> Result<ByteGrid> {
    let img = image::open(path)
        .with_context(|| format!("Error loading the image {}", path.display()))?;
    let gray = img.to_luma8();
    let (width, height) = gray.dimensions();
    Ok(ByteGrid::new(height as usize, width as usize, gray.into_raw())?)
}

/// Write a grid as lossless 8-bit grayscale PNG.
pub fn save_grayscale(path: &Path, grid: &ByteGrid) -> Result<()> {
    let width = u32::try_from(grid.width()).context("image too wide")?;
    let height = u32::try_from(grid.height()).context("image too tall")?;
    let img = GrayImage::from_raw(width, height, grid.as_bytes().to_vec())
        .context("pixel buffer does not match image dimensions")?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Error writing the image {}", path.display()))
}

/// What an output image holds; decides its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Grayscale,
    Encrypted(Mode, KeySize),
    Decrypted(Mode, KeySize),
}

impl Output {
    /// `{stem}.png`, `{stem}_{mode}_{bits}_encrypted.png` or `{stem}_{mode}_{bits}_decrypted.png`
    pub fn file_name(self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        match self {
            Output::Grayscale => format!("{stem}.png"),
            Output::Encrypted(mode, size) => format!("{stem}_{mode}_{}_encrypted.png", size.bits()),
            Output::Decrypted(mode, size) => format!("{stem}_{mode}_{}_decrypted.png", size.bits()),
        }
    }
}
