//! Mock hosts, registers and surfaces shared by the unit tests.

use crate::host::*;
use crate::memory::Memory;
use crate::register::Register;
use crate::ui::{InputKind, Surface};

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub fn context() -> Context {
    Rc::new(())
}

/// A register whose accessors count reads and record writes.
pub struct MockRegister {
    pub value: Rc<Cell<u64>>,
    pub reads: Rc<Cell<usize>>,
    pub writes: Rc<RefCell<Vec<u64>>>,

    name: String,
    size: u8,
    flags: RegisterFlags,
    bits: Option<Rc<[String]>>,
    readonly: bool,
}

impl MockRegister {
    pub fn new(name: &str, size: u8, value: u64) -> MockRegister {
        MockRegister {
            value: Rc::new(Cell::new(value)),
            reads: Rc::new(Cell::new(0)),
            writes: Rc::new(RefCell::new(vec![])),
            name: name.to_string(),
            size,
            flags: RegisterFlags::empty(),
            bits: None,
            readonly: false,
        }
    }

    pub fn readonly(mut self) -> MockRegister {
        self.readonly = true;
        self
    }

    pub fn with_bits(mut self, bits: &[&str]) -> MockRegister {
        let bits: Vec<String> = bits.iter().map(|bit| bit.to_string()).collect();
        self.bits = Some(bits.into());
        self
    }

    pub fn with_flags(mut self, flags: RegisterFlags) -> MockRegister {
        self.flags = flags;
        self
    }

    pub fn descriptor(&self) -> HostRegister {
        let value = self.value.clone();
        let reads = self.reads.clone();

        let get: RegisterGetter = Rc::new(move |_ctx| {
            reads.set(reads.get() + 1);
            value.get()
        });

        let set: Option<RegisterSetter> = if self.readonly {
            None
        } else {
            let value = self.value.clone();
            let writes = self.writes.clone();

            Some(Rc::new(move |_ctx, new_value| {
                writes.borrow_mut().push(new_value);
                value.set(new_value);
            }))
        };

        RegisterV1 {
            name: self.name.clone(),
            size: self.size,
            flags: self.flags,
            bits: self.bits.clone(),
            get,
            set,
        }
        .into()
    }

    pub fn register(&self) -> Register {
        Register::new(self.descriptor(), context())
    }
}

pub fn memory_descriptor(name: &str, ram: &Rc<RefCell<Vec<u8>>>, cpu_addressable: bool)
    -> HostMemory {
    let bytes = ram.clone();
    let flags = if cpu_addressable {
        MemoryFlags::CPU_ADDRESSABLE
    } else {
        MemoryFlags::empty()
    };

    MemoryV1 {
        description: name.to_string(),
        size: ram.borrow().len() as u64,
        flags,
        peek: Rc::new(move |_ctx, address| bytes.borrow()[address as usize]),
    }
    .into()
}

/// A memory region over a shared byte vector the test can keep mutating.
pub fn ram_region(name: &str, bytes: Vec<u8>, cpu_addressable: bool)
    -> (Memory, Rc<RefCell<Vec<u8>>>) {
    let ram = Rc::new(RefCell::new(bytes));
    let memory = Memory::new(memory_descriptor(name, &ram, cpu_addressable), context());

    (memory, ram)
}

//
// capability negotiation
//

pub struct MockHost {
    pub system: HostSystem,
    pub supported_version: u32,
    pub requests: RefCell<Vec<u32>>,
}

impl MockHost {
    pub fn new(system: HostSystem) -> Rc<MockHost> {
        Rc::new(MockHost {
            system,
            supported_version: DEBUGGER_INTERFACE_VERSION,
            requests: RefCell::new(vec![]),
        })
    }
}

impl DebuggerHost for MockHost {
    fn set_debugger(&self, version: u32) -> Option<Attachment> {
        self.requests.borrow_mut().push(version);

        if version != self.supported_version {
            return None;
        }

        Some(Attachment {
            system: self.system.clone(),
            context: context(),
        })
    }
}

#[derive(Default)]
pub struct MockConfig {
    pub host: Option<Rc<dyn DebuggerHost>>,
}

impl Config for MockConfig {
    fn extension(&self, name: &str) -> Option<Extension> {
        if name != SET_DEBUGGER_EXTENSION {
            return None;
        }

        self.host.clone().map(Extension::SetDebugger)
    }
}

//
// drawing
//

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BeginWindow(String),
    EndWindow,
    Text(String),
    Input {
        id: String,
        text: String,
        kind: InputKind,
        read_only: bool,
    },
    Checkbox {
        label: String,
        checked: bool,
    },
    Button {
        label: String,
        enabled: bool,
    },
    Combo {
        id: String,
        selected: usize,
        items: Vec<String>,
    },
    FillRect([f32; 2], [f32; 2]),
    Tooltip(Vec<String>),
}

/// Records every widget and answers with scripted user input. Scripted
/// presses, toggles and commits fire once.
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    pub size: [f32; 2],
    pub line_height: f32,
    pub hover_everything: bool,

    cursor_y: f32,
    presses: HashSet<String>,
    toggles: HashSet<String>,
    commits: HashMap<String, String>,
    selections: HashMap<String, usize>,
    closes: HashSet<String>,
}

impl RecordingSurface {
    pub fn new() -> RecordingSurface {
        RecordingSurface {
            calls: vec![],
            size: [400.0, 100.0],
            line_height: 10.0,
            hover_everything: false,
            cursor_y: 0.0,
            presses: HashSet::new(),
            toggles: HashSet::new(),
            commits: HashMap::new(),
            selections: HashMap::new(),
            closes: HashSet::new(),
        }
    }

    pub fn with_height(mut self, height: f32) -> RecordingSurface {
        self.size[1] = height;
        self
    }

    pub fn press(&mut self, label: &str) {
        self.presses.insert(label.to_string());
    }

    pub fn toggle(&mut self, label: &str) {
        self.toggles.insert(label.to_string());
    }

    pub fn commit(&mut self, id: &str, text: &str) {
        self.commits.insert(id.to_string(), text.to_string());
    }

    pub fn select(&mut self, id: &str, index: usize) {
        self.selections.insert(id.to_string(), index);
    }

    pub fn close(&mut self, title: &str) {
        self.closes.insert(title.to_string());
    }

    /// Starts a new pass: forgets the recorded calls and rewinds the cursor.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.cursor_y = 0.0;
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::Text(ref text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn windows(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::BeginWindow(ref title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn button(&self, label: &str) -> Option<bool> {
        self.calls.iter().find_map(|call| match *call {
            Call::Button {
                label: ref recorded,
                enabled,
            } if recorded == label => Some(enabled),
            _ => None,
        })
    }

    pub fn input(&self, id: &str) -> Option<(&str, bool)> {
        self.calls.iter().find_map(|call| match *call {
            Call::Input {
                id: ref recorded,
                ref text,
                read_only,
                ..
            } if recorded == id => Some((text.as_str(), read_only)),
            _ => None,
        })
    }

    pub fn checkboxes(&self) -> Vec<(&str, bool)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::Checkbox { ref label, checked } => Some((label.as_str(), checked)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::FillRect(..)))
            .count()
    }

    fn advance(&mut self) {
        self.cursor_y += self.line_height;
    }
}

impl Surface for RecordingSurface {
    fn available(&self) -> [f32; 2] {
        [self.size[0], (self.size[1] - self.cursor_y).max(0.0)]
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn cursor(&self) -> [f32; 2] {
        [0.0, self.cursor_y]
    }

    fn fill_rect(&mut self, min: [f32; 2], max: [f32; 2]) {
        self.calls.push(Call::FillRect(min, max));
    }

    fn text(&mut self, text: &str) {
        self.calls.push(Call::Text(text.to_string()));
        self.advance();
    }

    fn input_text(&mut self, id: &str, buffer: &mut String, kind: InputKind, read_only: bool)
        -> bool {
        self.calls.push(Call::Input {
            id: id.to_string(),
            text: buffer.clone(),
            kind,
            read_only,
        });
        self.advance();

        if read_only {
            return false;
        }

        match self.commits.remove(id) {
            Some(text) => {
                *buffer = text;
                true
            }
            None => false,
        }
    }

    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        self.calls.push(Call::Checkbox {
            label: label.to_string(),
            checked: *checked,
        });

        if self.toggles.remove(label) {
            *checked = !*checked;
            return true;
        }

        false
    }

    fn button(&mut self, label: &str, enabled: bool) -> bool {
        self.calls.push(Call::Button {
            label: label.to_string(),
            enabled,
        });
        self.advance();

        enabled && self.presses.remove(label)
    }

    fn combo(&mut self, id: &str, selected: &mut usize, items: &[&str]) -> bool {
        self.calls.push(Call::Combo {
            id: id.to_string(),
            selected: *selected,
            items: items.iter().map(|item| item.to_string()).collect(),
        });
        self.advance();

        match self.selections.remove(id) {
            Some(index) if index < items.len() => {
                *selected = index;
                true
            }
            _ => false,
        }
    }

    fn is_item_hovered(&self) -> bool {
        self.hover_everything
    }

    fn tooltip(&mut self, lines: &[String]) {
        self.calls.push(Call::Tooltip(lines.to_vec()));
    }

    fn begin_window(&mut self, title: &str, open: Option<&mut bool>) -> bool {
        self.calls.push(Call::BeginWindow(title.to_string()));
        self.cursor_y = 0.0;

        if let Some(open) = open {
            if self.closes.remove(title) {
                *open = false;
            }
        }

        true
    }

    fn end_window(&mut self) {
        self.calls.push(Call::EndWindow);
    }
}

/// A panel that records every handler it receives into a shared log.
pub struct MockPanel {
    pub title: String,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl MockPanel {
    pub fn new(title: &str, log: &Rc<RefCell<Vec<String>>>) -> MockPanel {
        MockPanel {
            title: title.to_string(),
            log: log.clone(),
        }
    }

    fn record(&self, handler: &str) {
        self.log
            .borrow_mut()
            .push(format!("{}:{}", self.title, handler));
    }
}

impl crate::lifecycle::Lifecycle for MockPanel {
    fn handle(&mut self, event: crate::lifecycle::Event) {
        self.record(event.handler_name());
    }
}

impl crate::panel::Panel for MockPanel {
    fn title(&self) -> &str {
        &self.title
    }

    fn on_draw(&mut self, surface: &mut dyn Surface, _spawner: &mut crate::panel::Spawner) {
        self.record("onDraw");
        surface.text(&self.title);
    }
}
