//! Row-major single-channel byte grid

use crate::error::{CodecError, Result};

/// A `height x width` grid of 8-bit samples stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteGrid {
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl ByteGrid {
    /// Wraps `data` as a grid, checking it holds exactly `height * width` samples.
    pub fn new(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        if height.checked_mul(width) != Some(data.len()) {
            return Err(CodecError::ShapeMismatch {
                height,
                width,
                len: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Caller guarantees `data.len() == height * width`.
    pub(crate) fn from_parts(height: usize, width: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), height * width);
        Self {
            height,
            width,
            data,
        }
    }

    /// # Panics
    ///
    /// Panics if `height * width` overflows `usize`.
    pub fn zeros(height: usize, width: usize) -> Self {
        let len = height
            .checked_mul(width)
            .unwrap_or_else(|| panic!("grid shape {height}x{width} overflows usize"));
        Self {
            height,
            width,
            data: vec![0u8; len],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.data[row * self.width + col])
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.data[start..start + self.width])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Keeps the top-left `height x width` region.
    ///
    /// Decryption never calls this: the codec returns padded shapes and the
    /// caller must know the original size to strip the margin.
    pub fn crop(&self, height: usize, width: usize) -> Result<Self> {
        if height > self.height || width > self.width {
            return Err(CodecError::CropOutOfBounds {
                from_height: self.height,
                from_width: self.width,
                height,
                width,
            });
        }

        let mut data = Vec::with_capacity(height * width);
        for row in self.data.chunks(self.width.max(1)).take(height) {
            data.extend_from_slice(&row[..width]);
        }

        Ok(Self {
            height,
            width,
            data,
        })
    }
}
