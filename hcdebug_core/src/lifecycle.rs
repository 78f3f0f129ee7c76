use std::fmt;

/// Console and game lifecycle transitions broadcast to panels and plugins.
///
/// Hosts emit them in this order:
/// `Started → CoreLoaded → GameLoaded → GameStarted → (GamePaused ⇄ GameResumed)*
/// → GameReset* → {Frame, Step}* → GameUnloaded → CoreUnloaded → Quit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Started,
    CoreLoaded,
    GameLoaded,
    GameStarted,
    GamePaused,
    GameResumed,
    GameReset,
    Frame,
    Step,
    GameUnloaded,
    CoreUnloaded,
    Quit,
}

impl Event {
    pub const ALL: [Event; 12] = [
        Event::Started,
        Event::CoreLoaded,
        Event::GameLoaded,
        Event::GameStarted,
        Event::GamePaused,
        Event::GameResumed,
        Event::GameReset,
        Event::Frame,
        Event::Step,
        Event::GameUnloaded,
        Event::CoreUnloaded,
        Event::Quit,
    ];

    pub fn handler_name(&self) -> &'static str {
        use self::Event::*;

        match *self {
            Started => "onStarted",
            CoreLoaded => "onCoreLoaded",
            GameLoaded => "onGameLoaded",
            GameStarted => "onGameStarted",
            GamePaused => "onGamePaused",
            GameResumed => "onGameResumed",
            GameReset => "onGameReset",
            Frame => "onFrame",
            Step => "onStep",
            GameUnloaded => "onGameUnloaded",
            CoreUnloaded => "onCoreUnloaded",
            Quit => "onQuit",
        }
    }

    /// Events fired every frame or step. They're kept out of the logs.
    pub fn is_high_frequency(&self) -> bool {
        matches!(*self, Event::Frame | Event::Step)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.handler_name())
    }
}

/// Lifecycle handlers shared by panels and plugins. All of them default to no-ops.
pub trait Lifecycle {
    fn on_started(&mut self) {}
    fn on_core_loaded(&mut self) {}
    fn on_game_loaded(&mut self) {}
    fn on_game_started(&mut self) {}
    fn on_game_paused(&mut self) {}
    fn on_game_resumed(&mut self) {}
    fn on_game_reset(&mut self) {}
    fn on_frame(&mut self) {}
    fn on_step(&mut self) {}
    fn on_game_unloaded(&mut self) {}
    fn on_core_unloaded(&mut self) {}
    fn on_quit(&mut self) {}

    fn handle(&mut self, event: Event) {
        use self::Event::*;

        match event {
            Started => self.on_started(),
            CoreLoaded => self.on_core_loaded(),
            GameLoaded => self.on_game_loaded(),
            GameStarted => self.on_game_started(),
            GamePaused => self.on_game_paused(),
            GameResumed => self.on_game_resumed(),
            GameReset => self.on_game_reset(),
            Frame => self.on_frame(),
            Step => self.on_step(),
            GameUnloaded => self.on_game_unloaded(),
            CoreUnloaded => self.on_core_unloaded(),
            Quit => self.on_quit(),
        }
    }
}
