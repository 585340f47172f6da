//! Zero padding of grids to the cipher block size

use crate::grid::ByteGrid;

/// Cipher block size in bytes. Both grid dimensions are aligned to it.
pub const BLOCK_SIZE: usize = 16;

/// Number of zero samples needed to bring `len` up to a multiple of [`BLOCK_SIZE`].
pub fn padding_for(len: usize) -> usize {
    (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE
}

pub fn is_aligned(grid: &ByteGrid) -> bool {
    grid.height() % BLOCK_SIZE == 0 && grid.width() % BLOCK_SIZE == 0
}

/// Add zero rows at the bottom and zero columns at the right until both
/// dimensions are multiples of [`BLOCK_SIZE`].
pub fn pad(grid: &ByteGrid) -> ByteGrid {
    if is_aligned(grid) {
        return grid.clone();
    }

    let (height, width) = grid.shape();
    let padded_height = height + padding_for(height);
    let padded_width = width + padding_for(width);

    let mut padded = vec![0u8; padded_height * padded_width];
    if width > 0 {
        for (src, dst) in grid
            .as_bytes()
            .chunks(width)
            .zip(padded.chunks_mut(padded_width))
        {
            dst[..width].copy_from_slice(src);
        }
    }

    ByteGrid::from_parts(padded_height, padded_width, padded)
}
