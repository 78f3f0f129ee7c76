use crate::errors::DebuggerError;
use crate::host::Config;
use crate::lifecycle::Event;
use crate::panel::{Panel, PanelHandle, PanelOptions, Spawner};
use crate::perf::Counter;
use crate::script::{self, ScriptValue};
use crate::ui::Surface;

use std::rc::Rc;
use tracing::{debug, warn};

pub const VIEWS_TITLE: &str = "Views";

struct Entry {
    key: String,
    handle: PanelHandle,
    top_level: bool,
    open: bool,
}

/// Host subsystems panels may look up through the desktop.
pub enum Subsystem {
    Config(Rc<dyn Config>),
}

/// Registry of every panel. Broadcasts lifecycle events to them in
/// registration order and draws the open ones.
pub struct Desktop {
    entries: Vec<Entry>,
    spawner: Spawner,
    config: Option<Rc<dyn Config>>,

    draws: Counter,
    frames: Counter,

    closed: bool,
}

impl Default for Desktop {
    fn default() -> Desktop {
        Desktop::new()
    }
}

impl Desktop {
    pub fn new() -> Desktop {
        Desktop {
            entries: vec![],
            spawner: Spawner::default(),
            config: None,
            draws: Counter::default(),
            frames: Counter::default(),
            closed: false,
        }
    }

    pub fn register(&mut self, panel: PanelHandle, options: PanelOptions)
        -> Result<(), DebuggerError> {
        if self.closed {
            return Err(DebuggerError::RegistryClosed);
        }

        let key = options.key.unwrap_or_else(|| panel.title());

        if self.entries.iter().any(|entry| entry.key == key) {
            return Err(DebuggerError::DuplicateKey(key));
        }

        debug!("Registered view {}", key);

        self.entries.push(Entry {
            key,
            handle: panel,
            top_level: options.top_level,
            open: options.open,
        });

        Ok(())
    }

    /// Registers an owned, top-level panel keyed by its title.
    pub fn add<P: Panel + 'static>(&mut self, panel: P) -> Result<(), DebuggerError> {
        let panel: Box<dyn Panel> = Box::new(panel);
        self.register(panel.into(), PanelOptions::default())
    }

    pub fn register_subsystem(&mut self, subsystem: Subsystem) {
        match subsystem {
            Subsystem::Config(config) => self.config = Some(config),
        }
    }

    pub fn config(&self) -> Option<Rc<dyn Config>> {
        self.config.clone()
    }

    pub fn dispatch(&mut self, event: Event) -> Result<(), DebuggerError> {
        if self.closed {
            return Err(DebuggerError::RegistryClosed);
        }

        if event == Event::Frame {
            self.frames.tick();
        }

        for entry in self.entries.iter_mut() {
            if !event.is_high_frequency() {
                debug!("{} {}", event, entry.key);
            }

            entry.handle.handle(event);
        }

        match event {
            Event::Started => self.draws.start(),
            Event::GameStarted => self.frames.start(),
            Event::GamePaused => self.frames.timer.pause(),
            Event::GameResumed => self.frames.timer.resume(),
            Event::GameUnloaded => self.frames.timer.stop(),
            Event::Quit => {
                self.draws.timer.stop();
                self.entries.clear();
                self.closed = true;
            }
            _ => {}
        }

        Ok(())
    }

    pub fn draw(&mut self, surface: &mut dyn Surface) -> Result<(), DebuggerError> {
        if self.closed {
            return Err(DebuggerError::RegistryClosed);
        }

        self.draws.tick();

        if surface.begin_window(VIEWS_TITLE, None) {
            for entry in self.entries.iter_mut().filter(|entry| entry.top_level) {
                surface.text(&entry.handle.title());
                surface.same_line();

                if surface.button(&format!("Open##{}", entry.key), !entry.open) {
                    entry.open = true;
                }
            }
        }

        surface.end_window();

        for entry in self.entries.iter_mut().filter(|entry| entry.open) {
            let title = entry.handle.title();

            if surface.begin_window(&title, Some(&mut entry.open)) {
                entry.handle.draw(surface, &mut self.spawner);
            }

            surface.end_window();
        }

        for panel in self.spawner.take() {
            let options = PanelOptions {
                top_level: false,
                ..PanelOptions::default()
            };

            if let Err(error) = self.register(panel.into(), options) {
                warn!("Could not open view: {}", error);
            }
        }

        Ok(())
    }

    /// Scripting view of the desktop: every scriptable panel under its key,
    /// plus the binding constants.
    pub fn script_table(&self) -> ScriptValue {
        let mut table = ScriptValue::table();

        for entry in self.entries.iter() {
            if let Some(value) = entry.handle.script() {
                table.set(&entry.key, value);
            }
        }

        script::add_constants(&mut table);
        table
    }

    pub fn draw_fps(&self) -> f64 {
        self.draws.rate()
    }

    pub fn frame_fps(&self) -> f64 {
        self.frames.rate()
    }

    pub fn reset_draw_fps(&mut self) {
        self.draws.reset();
    }

    pub fn reset_frame_fps(&mut self) {
        self.frames.reset();
    }

    pub fn draw_count(&self) -> u64 {
        self.draws.count()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames.count()
    }

    pub fn is_open(&self, key: &str) -> Option<bool> {
        self.entry(key).map(|entry| entry.open)
    }

    /// Returns `false` when no panel has that key.
    pub fn set_open(&mut self, key: &str, open: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.open = open;
                true
            }
            None => false,
        }
    }

    pub fn is_top_level(&self, key: &str) -> Option<bool> {
        self.entry(key).map(|entry| entry.top_level)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}
