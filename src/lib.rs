//! Decoder and software renderer for the CD+G (CD+Graphics) instruction
//! stream found on karaoke discs. Feed it the raw `.cdg` bytes and a playback
//! time, get back an indexed-color raster composed to RGBA.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod instructions;
pub mod parser;
pub mod player;
pub mod raster;

pub use player::{CdgError, CdgPlayer, Frame, RenderOptions};
pub use raster::{HEIGHT, WIDTH};
