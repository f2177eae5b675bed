use bit_field::BitField;
use log::debug;

use crate::parser::DATA;
use crate::raster::{RasterContext, HEIGHT, TILE_HEIGHT, TILE_WIDTH, WIDTH};

/// How blitted pixels combine with what is already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitMode {
    Set,
    Xor,
}

/// A 6x12 two-color glyph addressed by tile row/column. Each payload byte
/// holds one pixel row, bit 5 being the leftmost column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBlock {
    pub colors: [u8; 2],
    pub row: usize,
    pub column: usize,
    pub rows: [u8; 12],
}

impl TileBlock {
    pub fn decode(packet: &[u8]) -> Self {
        let mut rows = [0u8; 12];
        rows.copy_from_slice(&packet[DATA + 4..DATA + 16]);

        Self {
            colors: [packet[DATA].get_bits(0..4), packet[DATA + 1].get_bits(0..4)],
            row: packet[DATA + 2].get_bits(0..5) as usize,
            column: packet[DATA + 3].get_bits(0..6) as usize,
            rows,
        }
    }

    pub fn execute(&self, ctx: &mut RasterContext, mode: BlitMode) {
        let x = self.column * TILE_WIDTH;
        let y = self.row * TILE_HEIGHT;

        // a tile that would overhang the raster is dropped whole
        if x + TILE_WIDTH > WIDTH || y + TILE_HEIGHT > HEIGHT {
            debug!(target: "tile", "tile block out of bounds ({},{})", self.row, self.column);
            return;
        }

        for (i, row_bits) in self.rows.iter().enumerate() {
            for j in 0..TILE_WIDTH {
                let color = self.colors[row_bits.get_bit(5 - j) as usize];
                let offset = x + j + (y + i) * WIDTH;
                match mode {
                    BlitMode::Set => ctx.pixels[offset] = color,
                    BlitMode::Xor => ctx.pixels[offset] ^= color,
                }
            }
        }
    }
}
