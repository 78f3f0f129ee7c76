use crate::cpus::{describe_flags, Decoder};
use crate::debugger::disassembler::{self, visible_lines};
use crate::lifecycle::Lifecycle;
use crate::memory::{Memory, MemoryView};
use crate::numeric;
use crate::panel::{Panel, Spawner};
use crate::register::Register;
use crate::ui::{InputKind, Surface};

use std::rc::Rc;

/// Where the disassembly window is anchored.
#[derive(Clone)]
pub enum Follow {
    /// Tracks a live register, usually the program counter.
    Register(Rc<Register>),
    Address(u64),
}

pub struct DisasmPanel {
    title: String,
    memory: Memory,
    decoder: Rc<dyn Decoder>,

    register: Option<Rc<Register>>,
    // set while the window is frozen or has no register to follow
    frozen: Option<u64>,

    valid: bool,
}

impl DisasmPanel {
    pub fn new(cpu_name: &str, memory: Memory, decoder: Rc<dyn Decoder>, follow: Follow, id: u32)
        -> DisasmPanel {
        let (register, frozen) = match follow {
            Follow::Register(register) => (Some(register), None),
            Follow::Address(address) => (None, Some(address)),
        };

        DisasmPanel {
            title: format!("{} Disassembly##{}", cpu_name, id),
            memory,
            decoder,
            register,
            frozen,
            valid: true,
        }
    }

    pub fn following(&self) -> u64 {
        match (self.frozen, self.register.as_ref()) {
            (Some(address), _) => address,
            (None, Some(register)) => register.get(),
            (None, None) => 0,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Stops following the register, or starts following it again.
    pub fn toggle_freeze(&mut self) {
        if let Some(ref register) = self.register {
            self.frozen = match self.frozen {
                Some(_) => None,
                None => Some(register.get()),
            };
        }
    }

    fn draw_controls(&mut self, surface: &mut dyn Surface) {
        if self.register.is_some() {
            let label = if self.is_frozen() { "Follow" } else { "Freeze" };

            if surface.button(label, true) {
                self.toggle_freeze();
            }

            surface.same_line();
        }

        if let Some(address) = self.frozen {
            let digits = self.memory.required_digits();
            let mut text = format!("{:0digits$x}", address, digits = digits);

            if surface.input_text("##address", &mut text, InputKind::Hexadecimal, false) {
                if let Some(address) = numeric::parse_hex(&text) {
                    self.frozen = Some(address);
                }
            }
        }
    }
}

impl Lifecycle for DisasmPanel {
    fn on_game_unloaded(&mut self) {
        self.valid = false;
    }
}

impl Panel for DisasmPanel {
    fn title(&self) -> &str {
        &self.title
    }

    fn on_draw(&mut self, surface: &mut dyn Surface, _spawner: &mut Spawner) {
        if !self.valid {
            return;
        }

        self.draw_controls(surface);

        let available = surface.available();
        let line_height = surface.line_height();
        let num_lines = visible_lines(available[1], line_height);

        let following = self.following();
        let window = disassembler::window(&self.memory, self.decoder.as_ref(), following, num_lines);
        let digits = self.memory.required_digits();

        for line in window.lines.iter() {
            if line.is_current {
                let pos = surface.cursor();
                surface.fill_rect(pos, [pos[0] + available[0], pos[1] + line_height]);
            }

            surface.text(&line.format(digits));

            if surface.is_item_hovered() {
                surface.tooltip(&[line.cycles.to_string(), describe_flags(line.flags)]);
            }
        }
    }
}
