//! A minimal Z80 machine exposing itself to the debugger. It only executes
//! control flow and a handful of loads; everything else is skipped over.

use hcdebug_core::cpus::z80::Z80;
use hcdebug_core::cpus::Decoder;
use hcdebug_core::host::*;
use hcdebug_core::MemoryView;

use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

pub const RAM_SIZE: usize = 0x10000;
const VRAM_SIZE: usize = 0x1800;
pub const STEPS_PER_FRAME: usize = 64;

const FLAG_Z: u8 = 0x40;

const DEMO_PROGRAM: [u8; 10] = [
    0x06, 0x10, // ld b, $10
    0x3E, 0x00, // ld a, $00
    0x3C, // inc a
    0x10, 0xFD, // djnz $0004
    0xC3, 0x00, 0x00, // jp $0000
];

#[derive(Debug, Clone, Default)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,
}

pub struct Machine {
    pub regs: Registers,
    pub ram: Vec<u8>,
    pub vram: Vec<u8>,
    entry: u16,
}

struct Ram<'a>(&'a [u8]);

impl<'a> MemoryView for Ram<'a> {
    fn peek(&self, address: u64) -> u8 {
        self.0[address as usize]
    }

    fn size(&self) -> u64 {
        self.0.len() as u64
    }
}

impl Machine {
    pub fn new() -> Machine {
        let mut machine = Machine {
            regs: Registers::default(),
            ram: vec![0; RAM_SIZE],
            vram: vec![0; VRAM_SIZE],
            entry: 0,
        };

        machine.load(&DEMO_PROGRAM, 0);
        machine.reset();
        machine
    }

    /// Copies `image` to `origin`, dropping whatever doesn't fit.
    pub fn load(&mut self, image: &[u8], origin: u16) {
        let origin = origin as usize;
        let length = image.len().min(RAM_SIZE - origin);

        self.ram[origin..origin + length].copy_from_slice(&image[..length]);
    }

    pub fn set_entry_point(&mut self, entry: u16) {
        self.entry = entry;
        self.regs.pc = entry;
    }

    pub fn reset(&mut self) {
        self.regs = Registers {
            pc: self.entry,
            sp: 0xFFFF,
            ..Registers::default()
        };
    }

    pub fn run_frame(&mut self) {
        for _ in 0..STEPS_PER_FRAME {
            self.step();
        }
    }

    pub fn step(&mut self) {
        let pc = self.regs.pc;
        let instruction = Z80.decode(&Ram(&self.ram), pc as u64);
        let next = pc.wrapping_add(instruction.length.max(1) as u16);

        trace!("{:04x}: {}", pc, instruction.text);

        let byte = |offset: u16| self.ram[pc.wrapping_add(offset) as usize];
        let word = |offset: u16| byte(offset) as u16 | (byte(offset + 1) as u16) << 8;
        let relative = |offset: u16| next.wrapping_add(byte(offset) as i8 as u16);

        self.regs.pc = match byte(0) {
            0x76 => pc,
            0xC3 => word(1),
            0x18 => relative(1),
            0x10 => {
                let b = ((self.regs.bc >> 8) as u8).wrapping_sub(1);
                let target = relative(1);
                self.regs.bc = (self.regs.bc & 0x00FF) | (b as u16) << 8;

                if b != 0 {
                    target
                } else {
                    next
                }
            }
            0x06 => {
                self.regs.bc = (self.regs.bc & 0x00FF) | (byte(1) as u16) << 8;
                next
            }
            0x3E => {
                self.regs.a = byte(1);
                next
            }
            0x3C => {
                self.regs.a = self.regs.a.wrapping_add(1);
                self.regs.f = if self.regs.a == 0 {
                    self.regs.f | FLAG_Z
                } else {
                    self.regs.f & !FLAG_Z
                };
                next
            }
            _ => next,
        };

        self.regs.r = (self.regs.r & 0x80) | (self.regs.r.wrapping_add(1) & 0x7F);
    }
}

//
// debugger interface
//

fn machine(ctx: &Context) -> Option<&RefCell<Machine>> {
    ctx.downcast_ref::<RefCell<Machine>>()
}

fn register(
    name: &str,
    size: u8,
    flags: RegisterFlags,
    bits: Option<&[&str]>,
    get: fn(&Registers) -> u64,
    set: Option<fn(&mut Registers, u64)>,
) -> HostRegister {
    let getter: RegisterGetter = Rc::new(move |ctx| {
        machine(ctx)
            .map(|machine| get(&machine.borrow().regs))
            .unwrap_or(0)
    });

    let setter: Option<RegisterSetter> = set.map(|set| {
        let setter: RegisterSetter = Rc::new(move |ctx, value| {
            if let Some(machine) = machine(ctx) {
                set(&mut machine.borrow_mut().regs, value);
            }
        });
        setter
    });

    RegisterV1 {
        name: name.to_string(),
        size,
        flags,
        bits: bits.map(|bits| bits.iter().map(|bit| bit.to_string()).collect()),
        get: getter,
        set: setter,
    }
    .into()
}

fn registers() -> Vec<HostRegister> {
    let none = RegisterFlags::empty();
    let flags: &[&str] = &["S", "Z", "Y", "H", "X", "P", "N", "C"];

    vec![
        register("A", 1, none, None, |r| r.a as u64, Some(|r, v| r.a = v as u8)),
        register("F", 1, none, Some(flags), |r| r.f as u64, Some(|r, v| r.f = v as u8)),
        register("BC", 2, none, None, |r| r.bc as u64, Some(|r, v| r.bc = v as u16)),
        register("DE", 2, none, None, |r| r.de as u64, Some(|r, v| r.de = v as u16)),
        register(
            "HL",
            2,
            RegisterFlags::MEMORY_POINTER,
            None,
            |r| r.hl as u64,
            Some(|r, v| r.hl = v as u16),
        ),
        register("IX", 2, none, None, |r| r.ix as u64, Some(|r, v| r.ix = v as u16)),
        register("IY", 2, none, None, |r| r.iy as u64, Some(|r, v| r.iy = v as u16)),
        register(
            "SP",
            2,
            RegisterFlags::STACK_POINTER,
            None,
            |r| r.sp as u64,
            Some(|r, v| r.sp = v as u16),
        ),
        register(
            "PC",
            2,
            RegisterFlags::PROGRAM_COUNTER,
            None,
            |r| r.pc as u64,
            Some(|r, v| r.pc = v as u16),
        ),
        register("I", 1, none, None, |r| r.i as u64, Some(|r, v| r.i = v as u8)),
        // refreshed by the machine on every step
        register("R", 1, none, None, |r| r.r as u64, None),
    ]
}

fn ram_region(description: &str, size: usize, flags: MemoryFlags, video: bool) -> HostMemory {
    MemoryV1 {
        description: description.to_string(),
        size: size as u64,
        flags,
        peek: Rc::new(move |ctx, address| {
            machine(ctx)
                .and_then(|machine| {
                    let machine = machine.borrow();
                    let bytes = if video { &machine.vram } else { &machine.ram };
                    bytes.get(address as usize).copied()
                })
                .unwrap_or(0)
        }),
    }
    .into()
}

fn system() -> HostSystem {
    let step_into: StepInto = Rc::new(|ctx| {
        if let Some(machine) = machine(ctx) {
            machine.borrow_mut().step();
        }
    });

    let cpu = CpuV1 {
        description: "Z80".to_string(),
        registers: registers(),
        memory_regions: vec![ram_region(
            "Main RAM",
            RAM_SIZE,
            MemoryFlags::CPU_ADDRESSABLE,
            false,
        )],
        step_into: Some(step_into),
    };

    SystemV1 {
        description: "hcdebug demo Z80 machine".to_string(),
        cpus: vec![cpu.into()],
        memory_regions: vec![ram_region("Video RAM", VRAM_SIZE, MemoryFlags::empty(), true)],
    }
    .into()
}

/// Hands the machine to a debugger that asks for a supported version.
pub struct MachineHost {
    machine: Rc<RefCell<Machine>>,
}

impl DebuggerHost for MachineHost {
    fn set_debugger(&self, version: u32) -> Option<Attachment> {
        if version != DEBUGGER_INTERFACE_VERSION {
            return None;
        }

        Some(Attachment {
            system: system(),
            context: self.machine.clone(),
        })
    }
}

/// Host configuration with the debugger extension.
pub struct HostConfig {
    host: Rc<MachineHost>,
}

impl HostConfig {
    pub fn new(machine: Rc<RefCell<Machine>>) -> HostConfig {
        HostConfig {
            host: Rc::new(MachineHost { machine }),
        }
    }
}

impl Config for HostConfig {
    fn extension(&self, name: &str) -> Option<Extension> {
        match name {
            SET_DEBUGGER_EXTENSION => Some(Extension::SetDebugger(self.host.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_program_counts_down_b() {
        let mut machine = Machine::new();

        // ld b / ld a
        machine.step();
        machine.step();
        assert_eq!(machine.regs.bc >> 8, 0x10);

        // inc a / djnz, sixteen times
        for _ in 0..32 {
            machine.step();
        }

        assert_eq!(machine.regs.a, 0x10);
        assert_eq!(machine.regs.bc >> 8, 0);
        assert_eq!(machine.regs.pc, 0x0007);

        machine.step();
        assert_eq!(machine.regs.pc, 0x0000);
    }

    #[test]
    fn debugger_sees_the_machine() {
        let machine = Rc::new(RefCell::new(Machine::new()));
        let config = HostConfig::new(machine.clone());

        let host = match config.extension(SET_DEBUGGER_EXTENSION) {
            Some(Extension::SetDebugger(host)) => host,
            None => panic!("missing extension"),
        };

        assert!(host.set_debugger(2).is_none());

        let attachment = host.set_debugger(DEBUGGER_INTERFACE_VERSION).unwrap();
        let cpu = &attachment.system.cpus()[0];
        let pc = cpu
            .registers()
            .iter()
            .find(|register| register.name() == "PC")
            .unwrap();

        machine.borrow_mut().regs.pc = 0x1234;
        assert_eq!(pc.read(&attachment.context), 0x1234);

        pc.write(&attachment.context, 0x0002);
        assert_eq!(machine.borrow().regs.pc, 0x0002);

        cpu.step_into(&attachment.context);
        assert_eq!(machine.borrow().regs.pc, 0x0004);

        let r = cpu
            .registers()
            .iter()
            .find(|register| register.name() == "R")
            .unwrap();
        assert!(r.is_readonly());
    }
}
