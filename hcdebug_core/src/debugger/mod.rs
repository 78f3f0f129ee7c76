//! Debugger panels and the session negotiated with the host.

pub mod cpu;
pub mod disasm_view;
pub mod disassembler;
pub mod memory_view;

use self::cpu::CpuPanel;
use self::memory_view::MemoryPanel;

use crate::cpus::Decoder;
use crate::host::*;
use crate::lifecycle::Lifecycle;
use crate::memory::Memory;
use crate::panel::{Panel, Spawner};
use crate::script::ScriptValue;
use crate::ui::Surface;

use std::rc::Rc;
use tracing::{debug, warn};

pub const DEBUGGER_TITLE: &str = "Debugger";

/// State of an attached debugger, alive from game load to game unload.
pub struct Session {
    version: u32,
    system: HostSystem,
    context: Context,
    memories: Vec<Memory>,
}

impl Session {
    /// Asks the host for the debugger interface. Returns `None` when the host
    /// doesn't support debugging.
    pub fn negotiate(config: &dyn Config) -> Option<Session> {
        let host = match config.extension(SET_DEBUGGER_EXTENSION) {
            Some(Extension::SetDebugger(host)) => host,
            None => {
                debug!("Host doesn't provide {}", SET_DEBUGGER_EXTENSION);
                return None;
            }
        };

        let attachment = match host.set_debugger(DEBUGGER_INTERFACE_VERSION) {
            Some(attachment) => attachment,
            None => {
                debug!(
                    "Host refused debugger interface version {}",
                    DEBUGGER_INTERFACE_VERSION
                );
                return None;
            }
        };

        let system = attachment.system;
        let context = attachment.context;

        let count = system.memory_regions().len()
            + system
                .cpus()
                .iter()
                .map(|cpu| cpu.memory_regions().len())
                .sum::<usize>();

        let mut memories = memory_table(count)?;

        for region in system.memory_regions() {
            memories.push(Memory::new(region.clone(), context.clone()));
        }

        for cpu in system.cpus() {
            for region in cpu.memory_regions() {
                memories.push(Memory::new(region.clone(), context.clone()));
            }
        }

        debug!(
            "Debugger attached to {} with {} memory regions",
            system.description(),
            memories.len()
        );

        Some(Session {
            version: DEBUGGER_INTERFACE_VERSION,
            system,
            context,
            memories,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn description(&self) -> &str {
        self.system.description()
    }

    pub fn cpus(&self) -> &[HostCpu] {
        self.system.cpus()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// System regions first, then every CPU's regions in CPU order.
    pub fn memories(&self) -> &[Memory] {
        &self.memories
    }
}

fn memory_table(count: usize) -> Option<Vec<Memory>> {
    let mut memories = Vec::new();

    match memories.try_reserve(count) {
        Ok(()) => Some(memories),
        Err(err) => {
            warn!("Could not allocate {} memory regions: {}", count, err);
            None
        }
    }
}

/// Entry point of the debugger: lists the CPUs and memory regions of the
/// attached system and opens panels for them.
pub struct DebuggerPanel {
    config: Option<Rc<dyn Config>>,
    decoder: Rc<dyn Decoder>,

    session: Option<Session>,
    selected_cpu: usize,
}

impl DebuggerPanel {
    pub fn new(config: Option<Rc<dyn Config>>, decoder: Rc<dyn Decoder>) -> DebuggerPanel {
        DebuggerPanel {
            config,
            decoder,
            session: None,
            selected_cpu: 0,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn selected_cpu(&self) -> usize {
        self.selected_cpu
    }
}

impl Lifecycle for DebuggerPanel {
    fn on_game_loaded(&mut self) {
        self.session = match self.config {
            Some(ref config) => Session::negotiate(config.as_ref()),
            None => {
                debug!("No configuration subsystem, debugger disabled");
                None
            }
        };
    }

    fn on_game_unloaded(&mut self) {
        self.session = None;
        self.selected_cpu = 0;
    }
}

impl Panel for DebuggerPanel {
    fn title(&self) -> &str {
        DEBUGGER_TITLE
    }

    fn on_draw(&mut self, surface: &mut dyn Surface, spawner: &mut Spawner) {
        let session = match self.session {
            Some(ref session) => session,
            None => return,
        };

        surface.text(&format!(
            "{}, interface version {}",
            session.description(),
            session.version()
        ));

        let names: Vec<&str> = session.cpus().iter().map(|cpu| cpu.description()).collect();

        surface.combo("##Cpus", &mut self.selected_cpu, &names);
        surface.same_line();

        if surface.button("View", !names.is_empty()) {
            if let Some(cpu) = session.cpus().get(self.selected_cpu) {
                let id = spawner.next_id();
                let panel = CpuPanel::new(
                    cpu.clone(),
                    session.context().clone(),
                    self.decoder.clone(),
                    id,
                );

                spawner.open(Box::new(panel));
            }
        }

        for (index, memory) in session.memories().iter().enumerate() {
            if surface.button(&format!("{}##memory{}", memory.description(), index), true) {
                let id = spawner.next_id();
                spawner.open(Box::new(MemoryPanel::new(memory.clone(), id)));
            }
        }
    }

    fn script(&self) -> Option<ScriptValue> {
        let session = self.session.as_ref()?;
        let mut table = ScriptValue::table();

        table.set("description", session.description().into());
        table.set("version", (session.version() as i64).into());
        table.set("selectedCpu", (self.selected_cpu as i64).into());

        Some(table)
    }
}
