use crate::error::{Result, SaveError};

/// Packed indexed-colour pixel grid.
///
/// Rows are stored top to bottom with no padding. Inside a byte the leftmost
/// pixel sits in the least significant bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapGeometry {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
}

impl BitmapGeometry {
    pub const fn new(width: u32, height: u32, bits_per_pixel: u8) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
        }
    }

    pub const fn pixels_per_byte(&self) -> usize {
        8 / self.bits_per_pixel as usize
    }

    pub const fn row_bytes(&self) -> usize {
        self.width as usize * self.bits_per_pixel as usize / 8
    }

    pub const fn byte_len(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn mask(&self) -> u8 {
        ((1u16 << self.bits_per_pixel) - 1) as u8
    }

    /// Expands packed bytes into one palette index per pixel.
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() != self.byte_len() {
            return Err(SaveError::SizeMismatch {
                what: "bitmap data",
                expected: self.byte_len(),
                found: bytes.len(),
            });
        }
        let bpp = self.bits_per_pixel;
        let mask = self.mask();
        let mut indices = Vec::with_capacity(self.pixel_count());
        for &byte in bytes {
            for slot in 0..self.pixels_per_byte() {
                indices.push((byte >> (slot as u8 * bpp)) & mask);
            }
        }
        Ok(indices)
    }

    pub fn pack(&self, indices: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.byte_len()];
        self.pack_window(indices, &mut out, self.row_bytes(), 0, 0)?;
        Ok(out)
    }

    /// Packs `indices` (this geometry's size) into a larger grid whose rows
    /// are `grid_row_bytes` long, with the top-left pixel at `(x, y)`.
    pub fn pack_window(
        &self,
        indices: &[u8],
        grid: &mut [u8],
        grid_row_bytes: usize,
        x: u32,
        y: u32,
    ) -> Result<()> {
        if indices.len() != self.pixel_count() {
            return Err(SaveError::SizeMismatch {
                what: "pixel indices",
                expected: self.pixel_count(),
                found: indices.len(),
            });
        }
        let bpp = usize::from(self.bits_per_pixel);
        if (x as usize * bpp) % 8 != 0 {
            return Err(SaveError::UnalignedWindow { x });
        }
        let x_byte = x as usize * bpp / 8;
        let row_bytes = self.row_bytes();
        let first = y as usize * grid_row_bytes + x_byte;
        let last = first + (self.height as usize).saturating_sub(1) * grid_row_bytes + row_bytes;
        if x_byte + row_bytes > grid_row_bytes || last > grid.len() {
            return Err(SaveError::OutOfRange {
                offset: first,
                len: last.saturating_sub(first),
                store_len: grid.len(),
            });
        }

        let ppb = self.pixels_per_byte();
        let mask = self.mask();
        for (row_index, row) in indices.chunks(self.width as usize).enumerate() {
            let row_start = first + row_index * grid_row_bytes;
            for (byte_index, pixels) in row.chunks(ppb).enumerate() {
                let byte = pixels
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (slot, &index)| acc | ((index & mask) << (slot * bpp)));
                grid[row_start + byte_index] = byte;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bit_pixels_are_lsb_first() {
        let geometry = BitmapGeometry::new(4, 1, 2);
        let indices = geometry.unpack(&[0b11_10_01_00]).expect("one byte");
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(geometry.pack(&indices).expect("pack"), vec![0b11_10_01_00]);
    }

    #[test]
    fn window_lands_in_the_right_bytes() {
        let window = BitmapGeometry::new(8, 2, 1);
        let mut grid = vec![0u8; 3 * 3];
        window
            .pack_window(&[1; 16], &mut grid, 3, 8, 1)
            .expect("window fits");
        assert_eq!(grid, vec![0, 0, 0, 0, 0xFF, 0, 0, 0xFF, 0]);

        assert!(matches!(
            window.pack_window(&[1; 16], &mut grid, 3, 4, 0),
            Err(SaveError::UnalignedWindow { x: 4 })
        ));
        assert!(window.pack_window(&[1; 16], &mut grid, 3, 16, 2).is_err());
    }

    #[test]
    fn wrong_sizes_are_rejected() {
        let geometry = BitmapGeometry::new(40, 20, 2);
        assert_eq!(geometry.byte_len(), 200);
        assert!(geometry.unpack(&[0u8; 199]).is_err());
        assert!(geometry.pack(&[0u8; 799]).is_err());
    }
}
