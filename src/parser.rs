use alloc::vec::Vec;

use crate::instructions::CdgInstruction;

/// One instruction per 24-byte packet.
pub const PACKET_SIZE: usize = 24;

/// Low six bits of byte 0 flag a graphics packet; anything else is filler
/// belonging to other subcode channels.
pub const CDG_COMMAND: u8 = 0x09;

/// Offset of the opcode-specific payload inside a packet.
pub const DATA: usize = 4;

/// 4 packets per sector, 75 sectors per second of audio.
pub const PACKETS_PER_SECOND: f64 = 4.0 * 75.0;

/// Instructions decoded by one [`CdgParser::parse_through`] call, plus
/// whether a backward seek forced playback to restart from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub instructions: Vec<CdgInstruction>,
    pub restarted: bool,
}

/// Walks the packet stream in playback order, mapping elapsed seconds to a
/// packet index and decoding everything in between.
#[derive(Debug, Clone)]
pub struct CdgParser {
    bytes: Vec<u8>,
    num_packets: i64,
    pc: i64,
}

impl CdgParser {
    /// The caller guarantees `bytes.len()` is a multiple of [`PACKET_SIZE`].
    pub fn new(bytes: Vec<u8>) -> Self {
        let num_packets = (bytes.len() / PACKET_SIZE) as i64;
        Self {
            bytes,
            num_packets,
            pc: -1,
        }
    }

    /// Index of the last executed packet; -1 before playback starts.
    pub fn cursor(&self) -> i64 {
        self.pc
    }

    /// Decodes every packet between the cursor and the packet the stream
    /// rate puts at `seconds`. Noops advance the cursor but are not
    /// collected. A target behind the cursor rewinds to the top and reports
    /// `restarted`; the caller must reinitialize the raster before replay.
    pub fn parse_through(&mut self, seconds: f64) -> ParseResult {
        let target = (PACKETS_PER_SECOND * seconds) as i64;
        let mut restarted = false;

        if self.pc > target {
            self.pc = -1;
            restarted = true;
        }

        let mut instructions = Vec::new();
        while self.pc < target && self.pc + 1 < self.num_packets {
            self.pc += 1;
            let offset = self.pc as usize * PACKET_SIZE;
            let instruction = CdgInstruction::decode(&self.bytes[offset..offset + PACKET_SIZE]);

            if !instruction.is_noop() {
                instructions.push(instruction);
            }
        }

        ParseResult {
            instructions,
            restarted,
        }
    }
}
