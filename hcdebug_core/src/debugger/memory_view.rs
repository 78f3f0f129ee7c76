use crate::debugger::disassembler::visible_lines;
use crate::lifecycle::Lifecycle;
use crate::memory::{Memory, MemoryView};
use crate::numeric;
use crate::panel::{Panel, Spawner};
use crate::ui::{InputKind, Surface};

pub const BYTES_PER_ROW: u64 = 16;

/// One hex dump row: address, up to 16 bytes in hex, then the printable ones.
pub fn format_row(memory: &dyn MemoryView, start: u64, digits: usize) -> String {
    let end = start.saturating_add(BYTES_PER_ROW).min(memory.size());

    let mut hex = Vec::with_capacity(BYTES_PER_ROW as usize);
    let mut ascii = String::with_capacity(BYTES_PER_ROW as usize);

    for address in start..start.saturating_add(BYTES_PER_ROW) {
        if address < end {
            let byte = memory.peek(address);
            hex.push(format!("{:02x}", byte));
            ascii.push(if (0x20..0x7F).contains(&byte) { byte as char } else { '.' });
        } else {
            hex.push("  ".to_string());
        }
    }

    format!(
        "{:0digits$x}:  {}  {}",
        start,
        hex.join(" "),
        ascii,
        digits = digits
    )
}

/// Hex dump of one memory region.
pub struct MemoryPanel {
    title: String,
    memory: Memory,
    address: u64,
    valid: bool,
}

impl MemoryPanel {
    pub fn new(memory: Memory, id: u32) -> MemoryPanel {
        MemoryPanel::at(memory, 0, id)
    }

    /// A dump starting at the row that holds `address`.
    pub fn at(memory: Memory, address: u64, id: u32) -> MemoryPanel {
        let mut panel = MemoryPanel {
            title: format!("{}##{}", memory.description(), id),
            memory,
            address: 0,
            valid: true,
        };

        panel.go_to(address);
        panel
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    /// Moves the first row to the one holding `address`, clamped to the region.
    pub fn go_to(&mut self, address: u64) {
        let last = self.memory.size().saturating_sub(1);
        let address = address.min(last);

        self.address = address - address % BYTES_PER_ROW;
    }
}

impl Lifecycle for MemoryPanel {
    fn on_game_unloaded(&mut self) {
        self.valid = false;
    }
}

impl Panel for MemoryPanel {
    fn title(&self) -> &str {
        &self.title
    }

    fn on_draw(&mut self, surface: &mut dyn Surface, _spawner: &mut Spawner) {
        if !self.valid {
            return;
        }

        let digits = self.memory.required_digits();
        let mut text = format!("{:0digits$x}", self.address, digits = digits);

        if surface.input_text("##start", &mut text, InputKind::Hexadecimal, false) {
            if let Some(address) = numeric::parse_hex(&text) {
                self.go_to(address);
            }
        }

        let rows = visible_lines(surface.available()[1], surface.line_height());
        let size = self.memory.size();

        for row in 0..rows as u64 {
            let start = self.address + row * BYTES_PER_ROW;

            if start >= size {
                break;
            }

            surface.text(&format_row(&self.memory, start, digits));
        }
    }
}
