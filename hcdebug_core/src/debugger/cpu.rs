use crate::cpus::Decoder;
use crate::debugger::disasm_view::{DisasmPanel, Follow};
use crate::debugger::memory_view::MemoryPanel;
use crate::host::{Context, CpuInfo, HostCpu, RegisterFlags};
use crate::lifecycle::Lifecycle;
use crate::memory::Memory;
use crate::panel::{Panel, Spawner};
use crate::register::{BitEdit, Register};
use crate::script::ScriptValue;
use crate::ui::{InputKind, Surface};

use std::rc::Rc;
use tracing::warn;

/// Width of the register name cell.
const NAME_WIDTH: f32 = 32.0;

/// Register file and controls of one CPU.
pub struct CpuPanel {
    title: String,
    cpu: HostCpu,
    ctx: Context,
    decoder: Rc<dyn Decoder>,

    registers: Vec<Rc<Register>>,
    program_counter: Option<usize>,
    stack_pointer: Option<usize>,
    memory_pointers: Vec<usize>,
    main_memory: Option<Memory>,

    valid: bool,
}

impl CpuPanel {
    pub fn new(cpu: HostCpu, ctx: Context, decoder: Rc<dyn Decoder>, id: u32) -> CpuPanel {
        let mut registers = Vec::with_capacity(cpu.registers().len());
        let mut program_counter = None;
        let mut stack_pointer = None;
        let mut memory_pointers = vec![];

        for (index, desc) in cpu.registers().iter().enumerate() {
            let register = Register::new(desc.clone(), ctx.clone());
            let flags = register.flags();

            if flags.contains(RegisterFlags::PROGRAM_COUNTER) {
                program_counter = Some(index);
            } else if flags.contains(RegisterFlags::STACK_POINTER) {
                stack_pointer = Some(index);
            } else if flags.contains(RegisterFlags::MEMORY_POINTER) {
                memory_pointers.push(index);
            }

            registers.push(Rc::new(register));
        }

        if program_counter.is_none() {
            warn!("CPU {} has no program counter", cpu.description());
        }

        let main_memory = cpu
            .memory_regions()
            .iter()
            .map(|region| Memory::new(region.clone(), ctx.clone()))
            .find(Memory::is_cpu_addressable);

        CpuPanel {
            title: format!("{}##{}", cpu.description(), id),
            cpu,
            ctx,
            decoder,
            registers,
            program_counter,
            stack_pointer,
            memory_pointers,
            main_memory,
            valid: true,
        }
    }

    pub fn registers(&self) -> &[Rc<Register>] {
        &self.registers
    }

    pub fn program_counter(&self) -> Option<&Rc<Register>> {
        self.program_counter.map(|index| &self.registers[index])
    }

    pub fn stack_pointer(&self) -> Option<&Rc<Register>> {
        self.stack_pointer.map(|index| &self.registers[index])
    }

    pub fn memory_pointers(&self) -> impl Iterator<Item = &Rc<Register>> + '_ {
        self.memory_pointers.iter().map(move |&index| &self.registers[index])
    }

    pub fn main_memory(&self) -> Option<&Memory> {
        self.main_memory.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn can_step_into(&self) -> bool {
        self.cpu.can_step_into()
    }

    pub fn can_disassemble(&self) -> bool {
        self.program_counter.is_some() && self.main_memory.is_some()
    }

    /// Runs one instruction. Change tracking restarts so the registers the
    /// step touched are highlighted.
    pub fn step(&mut self) {
        self.clear_changes();
        self.cpu.step_into(&self.ctx);
    }

    fn clear_changes(&self) {
        for register in self.registers.iter() {
            register.clear_changed();
        }
    }

    /// Opens a disassembly following the program counter.
    pub fn open_disassembly(&self, spawner: &mut Spawner) {
        if let (Some(pc), Some(memory)) = (self.program_counter(), self.main_memory.as_ref()) {
            let panel = DisasmPanel::new(
                self.cpu.description(),
                memory.clone(),
                self.decoder.clone(),
                Follow::Register(pc.clone()),
                spawner.next_id(),
            );

            spawner.open(Box::new(panel));
        }
    }

    fn is_pointer(&self, index: usize) -> bool {
        self.stack_pointer == Some(index) || self.memory_pointers.contains(&index)
    }

    fn draw_register(&self, index: usize, surface: &mut dyn Surface, spawner: &mut Spawner) {
        let register = &self.registers[index];
        let line_height = surface.line_height();

        if register.changed() {
            let pos = surface.cursor();
            surface.fill_rect(pos, [pos[0] + NAME_WIDTH, pos[1] + line_height]);
        }

        surface.text(register.name());
        surface.same_line();

        let read_only = register.is_readonly();

        let mut hex = register.hex_string();
        if surface.input_text(&format!("##{}hex", index), &mut hex, InputKind::Hexadecimal, read_only)
        {
            register.apply_input(InputKind::Hexadecimal, &hex);
        }

        surface.same_line();

        let mut decimal = register.decimal_string();
        if surface.input_text(&format!("##{}dec", index), &mut decimal, InputKind::Decimal, read_only)
        {
            register.apply_input(InputKind::Decimal, &decimal);
        }

        if let Some(mut edit) = BitEdit::begin(register) {
            for (name, mask) in register.displayed_bits() {
                let mut checked = edit.is_set(mask);

                surface.checkbox(&format!("{}##{}", name, index), &mut checked);
                surface.same_line();

                edit.set_bit(mask, checked);
            }

            edit.commit();
        }

        if self.is_pointer(index) {
            if let Some(ref memory) = self.main_memory {
                if surface.button(&format!("View##{}mem", index), true) {
                    let panel = MemoryPanel::at(memory.clone(), register.get(), spawner.next_id());
                    spawner.open(Box::new(panel));
                }
            }
        }
    }
}

impl Lifecycle for CpuPanel {
    fn on_frame(&mut self) {
        self.clear_changes();
    }

    // the host stepped on its own, outside of `step`
    fn on_step(&mut self) {
        self.clear_changes();
    }

    fn on_game_unloaded(&mut self) {
        self.valid = false;
    }
}

impl Panel for CpuPanel {
    fn title(&self) -> &str {
        &self.title
    }

    fn on_draw(&mut self, surface: &mut dyn Surface, spawner: &mut Spawner) {
        if !self.valid {
            return;
        }

        for index in 0..self.registers.len() {
            self.draw_register(index, surface, spawner);
        }

        if surface.button("Disassembly", self.can_disassemble()) {
            self.open_disassembly(spawner);
        }

        if surface.button("Step", self.can_step_into()) {
            self.step();
        }
    }

    fn script(&self) -> Option<ScriptValue> {
        if !self.valid {
            return None;
        }

        let mut table = ScriptValue::table();

        for register in self.registers.iter() {
            table.set(register.name(), (register.get() as i64).into());
        }

        Some(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpus::z80::Z80;
    use crate::host::{CpuV1, HostMemory, StepInto};
    use crate::lifecycle::Event;
    use crate::test_utils::*;

    use std::cell::{Cell, RefCell};

    const Z80_FLAGS: [&str; 8] = ["S", "Z", "Y", "H", "X", "P", "N", "C"];

    struct Machine {
        a: MockRegister,
        f: MockRegister,
        hl: MockRegister,
        pc: MockRegister,
        sp: MockRegister,
        steps: Rc<Cell<usize>>,
    }

    impl Machine {
        fn new() -> Machine {
            Machine {
                a: MockRegister::new("A", 1, 0x12),
                f: MockRegister::new("F", 1, 0xFF).with_bits(&Z80_FLAGS),
                hl: MockRegister::new("HL", 2, 0x4000).with_flags(RegisterFlags::MEMORY_POINTER),
                pc: MockRegister::new("PC", 2, 0x0000).with_flags(RegisterFlags::PROGRAM_COUNTER),
                sp: MockRegister::new("SP", 2, 0xFFF0).with_flags(RegisterFlags::STACK_POINTER),
                steps: Rc::new(Cell::new(0)),
            }
        }

        fn cpu(&self, with_pc: bool, steppable: bool) -> HostCpu {
            let mut registers = vec![
                self.a.descriptor(),
                self.f.descriptor(),
                self.hl.descriptor(),
                self.sp.descriptor(),
            ];

            if with_pc {
                registers.push(self.pc.descriptor());
            }

            let ram = Rc::new(RefCell::new(vec![0u8; 0x10000]));
            let regions: Vec<HostMemory> = vec![
                memory_descriptor("ROM banks", &Rc::new(RefCell::new(vec![0u8; 0x20])), false),
                memory_descriptor("RAM", &ram, true),
            ];

            let step_into: Option<StepInto> = if steppable {
                let steps = self.steps.clone();
                let pc = self.pc.value.clone();

                Some(Rc::new(move |_ctx| {
                    steps.set(steps.get() + 1);
                    pc.set(pc.get() + 1);
                }))
            } else {
                None
            };

            CpuV1 {
                description: "Z80".to_string(),
                registers,
                memory_regions: regions,
                step_into,
            }
            .into()
        }
    }

    fn panel(cpu: HostCpu) -> CpuPanel {
        CpuPanel::new(cpu, context(), Rc::new(Z80), 7)
    }

    #[test]
    fn special_registers_are_found() {
        let machine = Machine::new();
        let panel = panel(machine.cpu(true, true));

        assert_eq!(panel.title(), "Z80##7");
        assert_eq!(panel.program_counter().map(|r| r.name()), Some("PC"));
        assert_eq!(panel.stack_pointer().map(|r| r.name()), Some("SP"));
        assert_eq!(
            panel.memory_pointers().map(|r| r.name()).collect::<Vec<_>>(),
            vec!["HL"]
        );
        assert_eq!(panel.main_memory().map(Memory::description), Some("RAM"));
    }

    #[test]
    fn unchecking_a_flag_clears_only_that_bit() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();
        let mut spawner = Spawner::default();

        surface.toggle("P##1");
        panel.on_draw(&mut surface, &mut spawner);

        assert_eq!(*machine.f.writes.borrow(), vec![0xFB]);
        assert_eq!(surface.checkboxes().len(), 8);
        assert!(machine.a.writes.borrow().is_empty());

        // Z is the second bit from the top
        surface.toggle("Z##1");
        panel.on_draw(&mut surface, &mut spawner);

        assert_eq!(*machine.f.writes.borrow(), vec![0xFB, 0xBB]);
    }

    #[test]
    fn drawing_without_edits_writes_nothing() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();

        panel.on_draw(&mut surface, &mut Spawner::default());

        assert!(machine.f.writes.borrow().is_empty());
        assert_eq!(surface.input("##0hex"), Some(("0x12", false)));
        assert_eq!(surface.input("##0dec"), Some(("18", false)));
        assert_eq!(surface.input("##2hex"), Some(("0x4000", false)));
    }

    #[test]
    fn field_edits_reach_the_host() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();

        surface.commit("##0hex", "0x3c");
        surface.commit("##2dec", "not a number");
        panel.on_draw(&mut surface, &mut Spawner::default());

        assert_eq!(*machine.a.writes.borrow(), vec![0x3C]);
        assert!(machine.hl.writes.borrow().is_empty());
    }

    #[test]
    fn changed_registers_are_highlighted_until_the_next_frame() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();

        panel.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(surface.rects(), 0);

        machine.a.value.set(0x13);
        panel.on_frame();
        surface.clear();
        panel.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(surface.rects(), 1);

        panel.on_frame();
        surface.clear();
        panel.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(surface.rects(), 0);
    }

    #[test]
    fn host_steps_highlight_what_they_changed() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();

        panel.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(surface.rects(), 0);

        machine.a.value.set(0x13);
        machine.pc.value.set(0x0001);
        panel.handle(Event::Step);
        surface.clear();
        panel.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(surface.rects(), 2);

        panel.handle(Event::Step);
        surface.clear();
        panel.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(surface.rects(), 0);
    }

    #[test]
    fn stepping_resets_change_tracking_and_calls_the_host() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));

        // snapshot taken before the step
        assert!(!panel.program_counter().unwrap().changed());

        panel.step();

        assert_eq!(machine.steps.get(), 1);
        assert!(panel.program_counter().unwrap().changed());
    }

    #[test]
    fn step_button_follows_the_host_capability() {
        let machine = Machine::new();
        let mut surface = RecordingSurface::new();

        let mut steppable = panel(machine.cpu(true, true));
        surface.press("Step");
        steppable.on_draw(&mut surface, &mut Spawner::default());
        assert_eq!(machine.steps.get(), 1);

        let mut stuck = panel(machine.cpu(true, false));
        surface.clear();
        surface.press("Step");
        stuck.on_draw(&mut surface, &mut Spawner::default());

        assert_eq!(surface.button("Step"), Some(false));
        assert_eq!(machine.steps.get(), 1);
    }

    #[test]
    fn disassembly_needs_a_program_counter() {
        let machine = Machine::new();
        let mut surface = RecordingSurface::new();
        let mut spawner = Spawner::default();

        let mut without_pc = panel(machine.cpu(false, true));
        without_pc.on_draw(&mut surface, &mut spawner);
        assert_eq!(surface.button("Disassembly"), Some(false));

        let mut with_pc = panel(machine.cpu(true, true));
        surface.clear();
        surface.press("Disassembly");
        with_pc.on_draw(&mut surface, &mut spawner);

        assert_eq!(spawner.pending(), 1);
        assert_eq!(spawner.take()[0].title(), "Z80 Disassembly##1");
    }

    #[test]
    fn pointer_registers_open_memory_views() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();
        let mut spawner = Spawner::default();

        surface.press("View##3mem");
        panel.on_draw(&mut surface, &mut spawner);

        assert_eq!(surface.button("View##0mem"), None);
        assert_eq!(surface.button("View##2mem"), Some(true));
        assert_eq!(spawner.take()[0].title(), "RAM##1");
    }

    #[test]
    fn unloaded_panels_draw_nothing() {
        let machine = Machine::new();
        let mut panel = panel(machine.cpu(true, true));
        let mut surface = RecordingSurface::new();

        panel.on_game_unloaded();
        panel.on_draw(&mut surface, &mut Spawner::default());

        assert!(surface.calls.is_empty());
        assert!(panel.script().is_none());
        assert!(!panel.is_valid());
    }

    #[test]
    fn script_exposes_register_values() {
        let machine = Machine::new();
        let panel = panel(machine.cpu(true, true));
        let table = panel.script().unwrap();

        assert_eq!(table.get("SP"), Some(&ScriptValue::Integer(0xFFF0)));
        assert_eq!(table.get("F"), Some(&ScriptValue::Integer(0xFF)));
    }
}
