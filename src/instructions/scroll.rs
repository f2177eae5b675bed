use bit_field::BitField;

use crate::parser::DATA;
use crate::raster::{RasterContext, HEIGHT, TILE_HEIGHT, TILE_WIDTH, WIDTH};

const SCROLL_NEGATIVE: u8 = 1;
const SCROLL_POSITIVE: u8 = 2;

/// What a scroll reads when the source coordinate falls off the raster:
/// the instruction's fill color, or the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeBehavior {
    Fill,
    Wrap,
}

/// Whole-tile scroll with fine offsets. Each axis carries a 2-bit command
/// (none/negative/positive) plus a sub-tile offset that shifts the
/// compositor's lookup without moving any pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scroll {
    pub color: u8,
    pub h_cmd: u8,
    pub h_offset: usize,
    pub v_cmd: u8,
    pub v_offset: usize,
}

impl Scroll {
    pub fn decode(packet: &[u8]) -> Self {
        let h_scroll = packet[DATA + 1];
        let v_scroll = packet[DATA + 2];

        Self {
            color: packet[DATA].get_bits(0..4),
            h_cmd: h_scroll.get_bits(4..6),
            h_offset: h_scroll.get_bits(0..3) as usize,
            v_cmd: v_scroll.get_bits(4..6),
            // the vertical offset spans a nibble; it has to reach 11
            v_offset: v_scroll.get_bits(0..4) as usize,
        }
    }

    pub fn execute(&self, ctx: &mut RasterContext, edge: EdgeBehavior) {
        ctx.h_offset = self.h_offset.min(TILE_WIDTH - 1);
        ctx.v_offset = self.v_offset.min(TILE_HEIGHT - 1);

        let h_move = movement(self.h_cmd, TILE_WIDTH as isize);
        let v_move = movement(self.v_cmd, TILE_HEIGHT as isize);

        if h_move == 0 && v_move == 0 {
            return;
        }

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let src_x = x as isize - h_move;
                let src_y = y as isize - v_move;

                ctx.buffer[x + y * WIDTH] = match edge {
                    EdgeBehavior::Wrap => {
                        let sx = src_x.rem_euclid(WIDTH as isize) as usize;
                        let sy = src_y.rem_euclid(HEIGHT as isize) as usize;
                        ctx.pixels[sx + sy * WIDTH]
                    }
                    EdgeBehavior::Fill => {
                        if (0..WIDTH as isize).contains(&src_x)
                            && (0..HEIGHT as isize).contains(&src_y)
                        {
                            ctx.pixels[src_x as usize + src_y as usize * WIDTH]
                        } else {
                            self.color
                        }
                    }
                };
            }
        }

        core::mem::swap(&mut ctx.pixels, &mut ctx.buffer);
    }
}

fn movement(cmd: u8, tile: isize) -> isize {
    match cmd {
        SCROLL_NEGATIVE => -tile,
        SCROLL_POSITIVE => tile,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PACKET_SIZE;

    fn scroll_packet(color: u8, h_scroll: u8, v_scroll: u8) -> [u8; PACKET_SIZE] {
        let mut packet = [0u8; PACKET_SIZE];
        packet[DATA] = color;
        packet[DATA + 1] = h_scroll;
        packet[DATA + 2] = v_scroll;
        packet
    }

    fn checkerboard() -> RasterContext {
        let mut ctx = RasterContext::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                ctx.pixels[x + y * WIDTH] = ((x / TILE_WIDTH + y / TILE_HEIGHT) % 16) as u8;
            }
        }
        ctx
    }

    #[test]
    fn command_and_offset_fields_decode() {
        let scroll = Scroll::decode(&scroll_packet(0x0A, 0b10_0101, 0b01_1011));
        assert_eq!(scroll.color, 10);
        assert_eq!(scroll.h_cmd, SCROLL_POSITIVE);
        assert_eq!(scroll.h_offset, 5);
        assert_eq!(scroll.v_cmd, SCROLL_NEGATIVE);
        assert_eq!(scroll.v_offset, 11);
    }

    #[test]
    fn offsets_clamp_to_the_tile_size() {
        let mut ctx = RasterContext::new();
        Scroll {
            color: 0,
            h_cmd: 0,
            h_offset: 7,
            v_cmd: 0,
            v_offset: 15,
        }
        .execute(&mut ctx, EdgeBehavior::Fill);
        assert_eq!(ctx.h_offset, TILE_WIDTH - 1);
        assert_eq!(ctx.v_offset, TILE_HEIGHT - 1);
    }

    #[test]
    fn zero_movement_still_updates_offsets() {
        let mut ctx = checkerboard();
        let before = ctx.pixels.clone();
        Scroll {
            color: 9,
            h_cmd: 0,
            h_offset: 2,
            v_cmd: 0,
            v_offset: 3,
        }
        .execute(&mut ctx, EdgeBehavior::Fill);
        assert_eq!(ctx.pixels, before);
        assert_eq!((ctx.h_offset, ctx.v_offset), (2, 3));
    }

    #[test]
    fn positive_scroll_fills_the_vacated_edge() {
        let mut ctx = checkerboard();
        let before = ctx.pixels.clone();
        Scroll {
            color: 13,
            h_cmd: SCROLL_POSITIVE,
            h_offset: 0,
            v_cmd: 0,
            v_offset: 0,
        }
        .execute(&mut ctx, EdgeBehavior::Fill);

        for y in 0..HEIGHT {
            // vacated left edge takes the fill color
            for x in 0..TILE_WIDTH {
                assert_eq!(ctx.pixels[x + y * WIDTH], 13);
            }
            // everything else moved one tile right
            for x in TILE_WIDTH..WIDTH {
                assert_eq!(ctx.pixels[x + y * WIDTH], before[(x - TILE_WIDTH) + y * WIDTH]);
            }
        }
    }

    #[test]
    fn negative_vertical_scroll_fills_the_bottom() {
        let mut ctx = checkerboard();
        let before = ctx.pixels.clone();
        Scroll {
            color: 4,
            h_cmd: 0,
            h_offset: 0,
            v_cmd: SCROLL_NEGATIVE,
            v_offset: 0,
        }
        .execute(&mut ctx, EdgeBehavior::Fill);

        for y in 0..HEIGHT - TILE_HEIGHT {
            for x in 0..WIDTH {
                assert_eq!(ctx.pixels[x + y * WIDTH], before[x + (y + TILE_HEIGHT) * WIDTH]);
            }
        }
        for y in HEIGHT - TILE_HEIGHT..HEIGHT {
            for x in 0..WIDTH {
                assert_eq!(ctx.pixels[x + y * WIDTH], 4);
            }
        }
    }

    #[test]
    fn wrap_scroll_carries_the_edge_around() {
        let mut ctx = checkerboard();
        let before = ctx.pixels.clone();
        Scroll {
            color: 13,
            h_cmd: SCROLL_POSITIVE,
            h_offset: 0,
            v_cmd: 0,
            v_offset: 0,
        }
        .execute(&mut ctx, EdgeBehavior::Wrap);

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let src_x = (x + WIDTH - TILE_WIDTH) % WIDTH;
                assert_eq!(ctx.pixels[x + y * WIDTH], before[src_x + y * WIDTH]);
            }
        }
    }

    #[test]
    fn wrap_scroll_composes_toroidally() {
        let one_tile = Scroll {
            color: 0,
            h_cmd: SCROLL_POSITIVE,
            h_offset: 0,
            v_cmd: 0,
            v_offset: 0,
        };

        let mut ctx = checkerboard();
        let before = ctx.pixels.clone();
        one_tile.execute(&mut ctx, EdgeBehavior::Wrap);
        one_tile.execute(&mut ctx, EdgeBehavior::Wrap);

        // two one-tile wraps match a single rotation by two tile widths
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let src_x = (x + WIDTH - 2 * TILE_WIDTH) % WIDTH;
                assert_eq!(ctx.pixels[x + y * WIDTH], before[src_x + y * WIDTH]);
            }
        }
    }

    #[test]
    fn full_wrap_cycle_is_identity() {
        let one_tile = Scroll {
            color: 0,
            h_cmd: SCROLL_POSITIVE,
            h_offset: 0,
            v_cmd: 0,
            v_offset: 0,
        };

        let mut ctx = checkerboard();
        let before = ctx.pixels.clone();
        for _ in 0..WIDTH / TILE_WIDTH {
            one_tile.execute(&mut ctx, EdgeBehavior::Wrap);
        }
        assert_eq!(ctx.pixels, before);
    }
}
