pub mod cpus;
pub mod debugger;
pub mod desktop;
mod errors;
pub mod host;
pub mod lifecycle;
pub mod memory;
pub mod numeric;
pub mod panel;
pub mod perf;
pub mod plugin;
pub mod register;
pub mod script;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use crate::cpus::{Decoder, Instruction};
pub use crate::debugger::DebuggerPanel;
pub use crate::desktop::{Desktop, Subsystem};
pub use crate::errors::DebuggerError;
pub use crate::lifecycle::{Event, Lifecycle};
pub use crate::memory::{Memory, MemoryView};
pub use crate::panel::{Panel, PanelHandle, PanelOptions, Spawner};
pub use crate::plugin::{Plugin, PluginKind, Plugins};
pub use crate::register::Register;
pub use crate::script::ScriptValue;
pub use crate::ui::{InputKind, Surface};
