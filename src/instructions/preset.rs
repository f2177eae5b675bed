use bit_field::BitField;

use crate::parser::DATA;
use crate::raster::RasterContext;

/// Fills the whole screen with one color. The repeat count is part of the
/// wire format (redundant-transmission hint) but never gates execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryPreset {
    pub color: u8,
    pub repeat: u8,
}

impl MemoryPreset {
    pub fn decode(packet: &[u8]) -> Self {
        Self {
            color: packet[DATA].get_bits(0..4),
            repeat: packet[DATA + 1].get_bits(0..4),
        }
    }

    pub fn execute(&self, ctx: &mut RasterContext) {
        ctx.pixels.fill(self.color);
        ctx.bg_color = Some(self.color);
        ctx.border_color = None;
        ctx.h_offset = 0;
        ctx.v_offset = 0;
    }
}

/// Sets the border color. The pixel buffer is untouched; the border is
/// painted outside the display area at composite time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderPreset {
    pub color: u8,
}

impl BorderPreset {
    pub fn decode(packet: &[u8]) -> Self {
        Self {
            color: packet[DATA].get_bits(0..4),
        }
    }

    pub fn execute(&self, ctx: &mut RasterContext) {
        ctx.border_color = Some(self.color);
    }
}

/// Designates one CLUT index as fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetKeyColor {
    pub index: u8,
}

impl SetKeyColor {
    pub fn decode(packet: &[u8]) -> Self {
        Self {
            index: packet[DATA].get_bits(0..4),
        }
    }

    pub fn execute(&self, ctx: &mut RasterContext) {
        ctx.key_color = Some(self.index);
    }
}
