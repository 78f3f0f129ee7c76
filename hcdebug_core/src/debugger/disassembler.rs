//! Instruction-aligned disassembly windows around a moving address.
//!
//! Instructions have variable length, so the only way to find where one starts
//! is to decode forward from a point known to be aligned. The window is rebuilt
//! from scratch every frame.

use crate::cpus::{Cycles, Decoder, MAX_INSTRUCTION_LENGTH};
use crate::memory::MemoryView;

/// Bytes per line assumed when backing up from the followed address.
const SCAN_BYTES_PER_LINE: u64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: u64,
    /// Raw bytes, hex, space separated.
    pub opcodes: String,
    pub text: String,
    pub cycles: Cycles,
    pub flags: &'static str,
    pub is_current: bool,
}

impl Line {
    pub fn format(&self, digits: usize) -> String {
        format!(
            "{:0digits$x}:  {:<11}  {}",
            self.address,
            self.opcodes,
            self.text,
            digits = digits
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub lines: Vec<Line>,
}

impl Window {
    pub fn first_address(&self) -> Option<u64> {
        self.lines.first().map(|line| line.address)
    }

    pub fn current_line(&self) -> Option<usize> {
        self.lines.iter().position(|line| line.is_current)
    }
}

/// Number of lines that fit in `height`.
pub fn visible_lines(height: f32, line_height: f32) -> usize {
    if height <= 0.0 || line_height <= 0.0 {
        return 0;
    }

    (height / line_height).ceil() as usize
}

/// Capacity hint for `lines` entries, never more than the region can hold.
fn capacity(lines: usize, size: u64) -> usize {
    (lines as u64).min(size.saturating_add(1)) as usize
}

#[inline]
fn instruction_length(length: u8) -> u64 {
    length.clamp(1, MAX_INSTRUCTION_LENGTH) as u64
}

/// Instruction starts from the scan origin up to the first one at or after
/// `following`. The scan origin is assumed to be aligned.
pub fn scan(memory: &dyn MemoryView, decoder: &dyn Decoder, following: u64, num_lines: usize)
    -> Vec<u64> {
    let size = memory.size();
    let back = (num_lines as u64).saturating_mul(SCAN_BYTES_PER_LINE);
    let mut address = following.saturating_sub(back);

    let mut starts = Vec::with_capacity(capacity(num_lines.saturating_add(num_lines / 2), size));

    loop {
        starts.push(address);

        if address >= following || address >= size {
            break;
        }

        let instruction = decoder.decode(memory, address);
        address += instruction_length(instruction.length);
    }

    starts
}

/// Address of the first visible line, keeping `following` roughly centered.
pub fn first_address(memory: &dyn MemoryView, decoder: &dyn Decoder, following: u64,
                     num_lines: usize) -> u64 {
    let starts = scan(memory, decoder, following, num_lines);
    let following_line = starts.len() - 1;
    let first_line = following_line.saturating_sub(num_lines / 2);

    starts[first_line]
}

/// Builds the `num_lines` lines of the window that follows `following`. The
/// window stops early at the end of `memory`.
pub fn window(memory: &dyn MemoryView, decoder: &dyn Decoder, following: u64, num_lines: usize)
    -> Window {
    let size = memory.size();
    let mut address = first_address(memory, decoder, following, num_lines);
    let mut lines = Vec::with_capacity(capacity(num_lines, size));

    while lines.len() < num_lines && address < size {
        let instruction = decoder.decode(memory, address);
        let length = instruction_length(instruction.length);

        let opcodes: Vec<String> = (address..address.saturating_add(length))
            .take_while(|&byte_address| byte_address < size)
            .map(|byte_address| format!("{:02x}", memory.peek(byte_address)))
            .collect();

        lines.push(Line {
            address,
            opcodes: opcodes.join(" "),
            text: instruction.text,
            cycles: instruction.cycles,
            flags: instruction.flags,
            is_current: address == following,
        });

        address += length;
    }

    Window { lines }
}
