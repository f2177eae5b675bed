pub mod clut;
pub mod preset;
pub mod scroll;
pub mod tile;

use bit_field::BitField;
use log::warn;

use crate::instructions::clut::LoadClut;
use crate::instructions::preset::{BorderPreset, MemoryPreset, SetKeyColor};
use crate::instructions::scroll::{EdgeBehavior, Scroll};
use crate::instructions::tile::{BlitMode, TileBlock};
use crate::parser::CDG_COMMAND;
use crate::raster::RasterContext;

pub const MEMORY_PRESET: u8 = 1;
pub const BORDER_PRESET: u8 = 2;
pub const TILE_BLOCK: u8 = 6;
pub const SCROLL_PRESET: u8 = 20;
pub const SCROLL_COPY: u8 = 24;
pub const SET_KEY_COLOR: u8 = 28;
pub const LOAD_CLUT_LOW: u8 = 30;
pub const LOAD_CLUT_HIGH: u8 = 31;
pub const TILE_BLOCK_XOR: u8 = 38;

/// One decoded graphics instruction. Decoding is pure; all side effects
/// happen in [`execute`](CdgInstruction::execute) against the raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdgInstruction {
    MemoryPreset(MemoryPreset),
    BorderPreset(BorderPreset),
    TileBlock(TileBlock),
    TileBlockXor(TileBlock),
    ScrollPreset(Scroll),
    ScrollCopy(Scroll),
    SetKeyColor(SetKeyColor),
    LoadClutLow(LoadClut),
    LoadClutHigh(LoadClut),
    Noop,
}

impl CdgInstruction {
    /// Decodes one 24-byte packet. Filler packets and unrecognized opcodes
    /// come back as `Noop`; decoding itself never fails.
    pub fn decode(packet: &[u8]) -> Self {
        if packet[0].get_bits(0..6) != CDG_COMMAND {
            return CdgInstruction::Noop;
        }

        let opcode = packet[1].get_bits(0..6);
        match opcode {
            MEMORY_PRESET => CdgInstruction::MemoryPreset(MemoryPreset::decode(packet)),
            BORDER_PRESET => CdgInstruction::BorderPreset(BorderPreset::decode(packet)),
            TILE_BLOCK => CdgInstruction::TileBlock(TileBlock::decode(packet)),
            TILE_BLOCK_XOR => CdgInstruction::TileBlockXor(TileBlock::decode(packet)),
            SCROLL_PRESET => CdgInstruction::ScrollPreset(Scroll::decode(packet)),
            SCROLL_COPY => CdgInstruction::ScrollCopy(Scroll::decode(packet)),
            SET_KEY_COLOR => CdgInstruction::SetKeyColor(SetKeyColor::decode(packet)),
            LOAD_CLUT_LOW => CdgInstruction::LoadClutLow(LoadClut::decode(packet)),
            LOAD_CLUT_HIGH => CdgInstruction::LoadClutHigh(LoadClut::decode(packet)),
            _ => {
                warn!(target: "parser", "unknown instruction (opcode = {})", opcode);
                CdgInstruction::Noop
            }
        }
    }

    pub fn execute(&self, ctx: &mut RasterContext) {
        match self {
            CdgInstruction::MemoryPreset(i) => i.execute(ctx),
            CdgInstruction::BorderPreset(i) => i.execute(ctx),
            CdgInstruction::TileBlock(i) => i.execute(ctx, BlitMode::Set),
            CdgInstruction::TileBlockXor(i) => i.execute(ctx, BlitMode::Xor),
            CdgInstruction::ScrollPreset(i) => i.execute(ctx, EdgeBehavior::Fill),
            CdgInstruction::ScrollCopy(i) => i.execute(ctx, EdgeBehavior::Wrap),
            CdgInstruction::SetKeyColor(i) => i.execute(ctx),
            CdgInstruction::LoadClutLow(i) => i.execute(ctx, 0),
            CdgInstruction::LoadClutHigh(i) => i.execute(ctx, 8),
            CdgInstruction::Noop => {}
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, CdgInstruction::Noop)
    }
}
