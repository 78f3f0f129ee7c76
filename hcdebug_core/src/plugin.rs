use crate::errors::DebuggerError;
use crate::lifecycle::{Event, Lifecycle};
use crate::script::{self, ScriptValue};
use crate::ui::Surface;

use std::fmt;
use tracing::{debug, error};

pub const PLUGINS_TITLE: &str = "Plugins";

/// What a plugin provides to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Audio,
    Config,
    Input,
    Led,
    Logger,
    Perf,
    Video,
    Control,
    Memory,
    Manager,
}

impl PluginKind {
    pub const ALL: [PluginKind; 10] = [
        PluginKind::Audio,
        PluginKind::Config,
        PluginKind::Input,
        PluginKind::Led,
        PluginKind::Logger,
        PluginKind::Perf,
        PluginKind::Video,
        PluginKind::Control,
        PluginKind::Memory,
        PluginKind::Manager,
    ];

    pub fn type_name(&self) -> &'static str {
        use self::PluginKind::*;

        match *self {
            Audio => "audio",
            Config => "config",
            Input => "input",
            Led => "led",
            Logger => "logger",
            Perf => "perf",
            Video => "video",
            Control => "control",
            Memory => "memory",
            Manager => "manager",
        }
    }

    pub fn tag(&self) -> u32 {
        *self as u32
    }

    /// Converts a tag coming from a loaded plugin. An unknown tag means the
    /// plugin was built against another interface, and the process aborts.
    pub fn from_tag(tag: u32) -> PluginKind {
        match PluginKind::try_from(tag) {
            Ok(kind) => kind,
            Err(err) => {
                error!("{}", err);
                std::process::abort();
            }
        }
    }
}

impl TryFrom<u32> for PluginKind {
    type Error = DebuggerError;

    fn try_from(tag: u32) -> Result<PluginKind, DebuggerError> {
        PluginKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == tag)
            .ok_or(DebuggerError::UnknownPluginKind(tag))
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

pub trait Plugin: Lifecycle {
    fn kind(&self) -> PluginKind;
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn license(&self) -> &str;
    fn copyright(&self) -> &str;
    fn url(&self) -> &str;

    /// Draws the plugin's own windows, if any. `open` is the flag toggled from
    /// the plugin listing.
    fn on_draw(&mut self, _surface: &mut dyn Surface, _open: &mut bool) {}

    fn script(&self) -> ScriptValue {
        let mut table = ScriptValue::table();

        table.set("name", self.name().into());
        table.set("version", self.version().into());
        table.set("license", self.license().into());
        table.set("copyright", self.copyright().into());
        table.set("url", self.url().into());
        table.set("type", self.kind().type_name().into());

        table
    }
}

struct View {
    plugin: Box<dyn Plugin>,
    open: bool,
}

/// Owns every loaded plugin and keeps them in step with the lifecycle.
#[derive(Default)]
pub struct Plugins {
    views: Vec<View>,
    closed: bool,
}

impl Plugins {
    pub fn new() -> Plugins {
        Plugins::default()
    }

    pub fn name(&self) -> &'static str {
        "hcdebug built-in plugin manager"
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn license(&self) -> &'static str {
        script::LICENSE
    }

    pub fn copyright(&self) -> &'static str {
        script::COPYRIGHT
    }

    pub fn url(&self) -> &'static str {
        script::URL
    }

    pub fn add(&mut self, plugin: Box<dyn Plugin>) -> Result<(), DebuggerError> {
        if self.closed {
            return Err(DebuggerError::RegistryClosed);
        }

        debug!(
            "Added {} plugin {} ({})",
            plugin.kind(),
            plugin.name(),
            plugin.version()
        );

        self.views.push(View { plugin, open: true });
        Ok(())
    }

    pub fn dispatch(&mut self, event: Event) -> Result<(), DebuggerError> {
        if self.closed {
            return Err(DebuggerError::RegistryClosed);
        }

        for view in self.views.iter_mut() {
            let plugin = &mut view.plugin;

            if !event.is_high_frequency() {
                debug!(
                    "{} plugin {} ({}): {}",
                    event,
                    plugin.name(),
                    plugin.version(),
                    plugin.copyright()
                );
            }

            plugin.handle(event);
        }

        if event == Event::Quit {
            self.views.clear();
            self.closed = true;
        }

        Ok(())
    }

    pub fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DebuggerError> {
        if self.closed {
            return Err(DebuggerError::RegistryClosed);
        }

        if surface.begin_window(PLUGINS_TITLE, None) {
            for (index, view) in self.views.iter_mut().enumerate() {
                surface.text(view.plugin.name());
                surface.same_line();
                surface.text(view.plugin.version());
                surface.same_line();

                if surface.button(&format!("Open##{}", index), !view.open) {
                    view.open = true;
                }
            }
        }

        surface.end_window();

        for view in self.views.iter_mut() {
            view.plugin.on_draw(surface, &mut view.open);
        }

        Ok(())
    }

    /// Every plugin's table under its type name, plus the binding constants.
    pub fn script_table(&self) -> ScriptValue {
        let mut table = ScriptValue::table();

        for view in self.views.iter() {
            table.set(view.plugin.kind().type_name(), view.plugin.script());
        }

        script::add_constants(&mut table);
        table
    }

    pub fn is_open(&self, index: usize) -> Option<bool> {
        self.views.get(index).map(|view| view.open)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
