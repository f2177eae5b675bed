use alloc::boxed::Box;
use alloc::vec;

pub const WIDTH: usize = 300;
pub const HEIGHT: usize = 216;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Safe display area as `[left, top, right, bottom)`; anything outside is
/// border territory and only ever painted at composite time.
pub const DISPLAY_BOUNDS: [usize; 4] = [6, 12, 294, 204];

pub const TILE_WIDTH: usize = 6;
pub const TILE_HEIGHT: usize = 12;

/// Screen state shared by every instruction: the indexed pixel buffer, the
/// 16-entry color lookup table, scroll offsets, and the key/background/border
/// color indices. Pixel values stay in 0..=15; the CLUT maps them to RGB.
#[derive(Debug, Clone)]
pub struct RasterContext {
    pub h_offset: usize,
    pub v_offset: usize,
    pub key_color: Option<u8>,
    pub bg_color: Option<u8>,
    pub border_color: Option<u8>,
    pub clut: [[u8; 3]; 16],

    // heap allocations to keep the big buffers off the stack, esp on web
    pub pixels: Box<[u8]>,
    pub buffer: Box<[u8]>,

    image: Box<[[u8; 4]]>,
    background_rgba: [u8; 4],
    content_bounds: [usize; 4],
}

impl Default for RasterContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterContext {
    pub fn new() -> Self {
        Self {
            h_offset: 0,
            v_offset: 0,
            key_color: None,
            bg_color: None,
            border_color: None,
            clut: [[0; 3]; 16],
            pixels: vec![0; PIXEL_COUNT].into_boxed_slice(),
            buffer: vec![0; PIXEL_COUNT].into_boxed_slice(),
            image: vec![[0; 4]; PIXEL_COUNT].into_boxed_slice(),
            background_rgba: [0, 0, 0, 0],
            content_bounds: [0, 0, 0, 0],
        }
    }

    /// Resets everything back to the freshly-loaded state.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Stores a CLUT entry from 4-bit channels, scaled onto 0..=255.
    pub fn set_clut_entry(&mut self, index: usize, r: u8, g: u8, b: u8) {
        self.clut[index] = [r * 17, g * 17, b * 17];
    }

    /// The composed frame as flat RGBA bytes, row-major.
    pub fn image_rgba(&self) -> &[u8] {
        bytemuck::cast_slice(&self.image)
    }

    pub fn background_rgba(&self) -> [u8; 4] {
        self.background_rgba
    }

    pub fn content_bounds(&self) -> [usize; 4] {
        self.content_bounds
    }

    /// Composes the indexed pixel buffer into the RGBA image, and refreshes
    /// the reported background color and content bounds.
    ///
    /// With `force_key` set, the background-preset color (or everything, if
    /// no background was ever preset) is keyed out along with the key color.
    pub fn render_frame(&mut self, force_key: bool) {
        let [left, top, right, bottom] = DISPLAY_BOUNDS;
        let (mut x1, mut y1, mut x2, mut y2) = (WIDTH, HEIGHT, 0, 0);
        let mut is_content = false;

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let outside_display = x < left || y < top || x >= right || y >= bottom;

                let color_index = match self.border_color {
                    Some(border) if outside_display => border,
                    _ => {
                        // scroll offsets shift the lookup; no wraparound here
                        let px = x + self.h_offset;
                        let py = y + self.v_offset;
                        if px < WIDTH && py < HEIGHT {
                            self.pixels[px + py * WIDTH]
                        } else {
                            0
                        }
                    }
                };

                let [r, g, b] = self.clut[color_index as usize];
                let is_key = Some(color_index) == self.key_color
                    || (force_key && (Some(color_index) == self.bg_color || self.bg_color.is_none()));

                self.image[x + y * WIDTH] = [r, g, b, if is_key { 0x00 } else { 0xFF }];

                if !is_key {
                    is_content = true;
                    if x1 > x {
                        x1 = x;
                    }
                    if y1 > y {
                        y1 = y;
                    }
                    if x2 < x {
                        x2 = x;
                    }
                    if y2 < y {
                        y2 = y;
                    }
                }
            }
        }

        // second coordinate pair is exclusive, hence the +1; an all-keyed
        // frame only collapses to zeros when force_key is in play
        self.content_bounds = if is_content || !force_key {
            [x1, y1, x2 + 1, y2 + 1]
        } else {
            [0, 0, 0, 0]
        };

        self.background_rgba = match self.bg_color {
            None => [0, 0, 0, if force_key { 0 } else { 1 }],
            Some(bg) => {
                let [r, g, b] = self.clut[bg as usize];
                let keyed = Some(bg) == self.key_color || force_key;
                [r, g, b, if keyed { 0 } else { 1 }]
            }
        };
    }
}
