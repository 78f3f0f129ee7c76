use hcdebug_core::{Lifecycle, Plugin, PluginKind, ScriptValue, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Stopped,
    Running,
    Paused,
}

/// Shows whether the game runs and how many frames it has run for.
pub struct ControlPlugin {
    status: Status,
    frames: u64,
    steps: u64,
}

impl Default for ControlPlugin {
    fn default() -> ControlPlugin {
        ControlPlugin {
            status: Status::Stopped,
            frames: 0,
            steps: 0,
        }
    }
}

impl ControlPlugin {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Lifecycle for ControlPlugin {
    fn on_game_started(&mut self) {
        self.status = Status::Running;
    }

    fn on_game_paused(&mut self) {
        self.status = Status::Paused;
    }

    fn on_game_resumed(&mut self) {
        self.status = Status::Running;
    }

    fn on_game_reset(&mut self) {
        self.frames = 0;
        self.steps = 0;
    }

    fn on_frame(&mut self) {
        self.frames += 1;
    }

    fn on_step(&mut self) {
        self.steps += 1;
    }

    fn on_game_unloaded(&mut self) {
        self.status = Status::Stopped;
    }
}

impl Plugin for ControlPlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::Control
    }

    fn name(&self) -> &str {
        "hcdebug control"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn license(&self) -> &str {
        "MIT"
    }

    fn copyright(&self) -> &str {
        "Copyright (c) 2020 Andre Leiradella"
    }

    fn url(&self) -> &str {
        "https://github.com/leiradel/hackable-console"
    }

    fn on_draw(&mut self, surface: &mut dyn Surface, open: &mut bool) {
        if !*open {
            return;
        }

        if surface.begin_window("Control", Some(open)) {
            surface.text(&format!("{:?}", self.status));
            surface.same_line();
            surface.text(&format!("frames: {}", self.frames));
            surface.same_line();
            surface.text(&format!("steps: {}", self.steps));
        }

        surface.end_window();
    }

    fn script(&self) -> ScriptValue {
        let mut table = ScriptValue::table();

        table.set("name", self.name().into());
        table.set("status", format!("{:?}", self.status).into());
        table.set("frames", (self.frames as i64).into());
        table.set("type", self.kind().type_name().into());

        table
    }
}
