use thiserror::Error;

use crate::parser::{CdgParser, ParseResult, PACKET_SIZE};
use crate::raster::RasterContext;

#[derive(Debug, Error)]
pub enum CdgError {
    /// The render time was NaN or negative.
    #[error("invalid time: {0}")]
    InvalidTime(f64),
    /// The loaded buffer does not divide into whole 24-byte packets.
    #[error("buffer length {0} is not a multiple of the 24-byte packet size")]
    UnalignedBuffer(usize),
}

/// Per-call rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Also treat the background-preset color as transparent, even if the
    /// title never declared a key color.
    pub force_key: bool,
}

/// One rendered frame, borrowed from the player's raster state.
#[derive(Debug)]
pub struct Frame<'a> {
    /// RGBA pixel data, 300x216, 4 bytes per pixel, row-major.
    pub image_rgba: &'a [u8],
    /// Whether anything changed since the previous render call. Useful for
    /// skipping redundant repaints.
    pub is_changed: bool,
    /// Dominant background color; alpha is 0 or 1 and accounts for
    /// `force_key`.
    pub background_rgba: [u8; 4],
    /// `[x1, y1, x2, y2)` around all non-transparent pixels. `[0, 0, 0, 0]`
    /// when nothing is visible under `force_key`.
    pub content_bounds: [usize; 4],
}

/// Plays a CD+G stream against a raster, one `render` call per tick.
///
/// The caller owns the clock: pass the current audio position and the player
/// decodes exactly the packets that belong on screen by then. Seeking
/// backward replays the stream from the top.
pub struct CdgPlayer {
    ctx: RasterContext,
    parser: CdgParser,
    force_key: Option<bool>,
}

impl CdgPlayer {
    /// Creates a player over raw `.cdg` data.
    pub fn new(data: &[u8]) -> Result<Self, CdgError> {
        if data.len() % PACKET_SIZE != 0 {
            return Err(CdgError::UnalignedBuffer(data.len()));
        }

        Ok(Self {
            ctx: RasterContext::new(),
            parser: CdgParser::new(data.to_vec()),
            force_key: None,
        })
    }

    /// Replaces the stream, rewinding the cursor and clearing the raster.
    /// On error the player is left untouched.
    pub fn load(&mut self, data: &[u8]) -> Result<(), CdgError> {
        if data.len() % PACKET_SIZE != 0 {
            return Err(CdgError::UnalignedBuffer(data.len()));
        }

        self.parser = CdgParser::new(data.to_vec());
        self.ctx.init();
        self.force_key = None;
        Ok(())
    }

    /// Advances playback to `seconds` and returns the frame that belongs on
    /// screen at that moment.
    ///
    /// The raster is only recomposited when the call did visible work (or
    /// `force_key` changed); otherwise the previous frame comes back with
    /// `is_changed == false`.
    pub fn render(&mut self, seconds: f64, options: RenderOptions) -> Result<Frame<'_>, CdgError> {
        if seconds.is_nan() || seconds < 0.0 {
            return Err(CdgError::InvalidTime(seconds));
        }

        let ParseResult {
            instructions,
            restarted,
        } = self.parser.parse_through(seconds);

        let is_changed =
            !instructions.is_empty() || restarted || Some(options.force_key) != self.force_key;
        self.force_key = Some(options.force_key);

        if restarted {
            self.ctx.init();
        }

        for instruction in &instructions {
            instruction.execute(&mut self.ctx);
        }

        if is_changed {
            self.ctx.render_frame(options.force_key);
        }

        Ok(Frame {
            image_rgba: self.ctx.image_rgba(),
            is_changed,
            background_rgba: self.ctx.background_rgba(),
            content_bounds: self.ctx.content_bounds(),
        })
    }
}
