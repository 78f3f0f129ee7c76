mod command;
mod control;
mod machine;
mod surface;

use crate::command::{Command, CommandError};
use crate::control::ControlPlugin;
use crate::machine::{HostConfig, Machine};
use crate::surface::{Action, TextSurface};

use hcdebug_core::cpus::z80::Z80;
use hcdebug_core::numeric::parse_literal;
use hcdebug_core::{DebuggerError, DebuggerPanel, Desktop, Event, Plugins, Subsystem};

use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ROWS: usize = 16;

#[derive(Error, Debug)]
enum FrontendError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Debugger(#[from] DebuggerError),
    #[error("{0}")]
    Usage(String),
}

struct Options {
    image: Option<PathBuf>,
    origin: u16,
    entry: Option<u16>,
    rows: usize,
}

enum Flow {
    Continue,
    Quit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let result = parse_args(&args).and_then(run);

    if let Err(e) = result {
        error!("{}", e);

        if let FrontendError::Usage(_) = e {
            println!("Usage: hcdebug [--image path] [--origin addr] [--entry addr] [--rows n]");
        }

        std::process::exit(1);
    }
}

fn parse_address(args: &[String], index: usize) -> Result<u16, FrontendError> {
    let text = args
        .get(index)
        .ok_or_else(|| FrontendError::Usage(format!("{} needs an address", args[index - 1])))?;

    parse_literal(text)
        .filter(|address| *address <= 0xFFFF)
        .map(|address| address as u16)
        .ok_or_else(|| FrontendError::Usage(format!("Invalid address: {}", text)))
}

fn parse_args(args: &[String]) -> Result<Options, FrontendError> {
    let mut options = Options {
        image: None,
        origin: 0,
        entry: None,
        rows: DEFAULT_ROWS,
    };

    let mut arg_index = 1;
    while arg_index < args.len() {
        let arg = &args[arg_index];
        if arg == "--image" {
            let path = args
                .get(arg_index + 1)
                .ok_or_else(|| FrontendError::Usage("--image needs a path".to_string()))?;
            options.image = Some(PathBuf::from(path));
            arg_index += 2;
        } else if arg == "--origin" {
            options.origin = parse_address(args, arg_index + 1)?;
            arg_index += 2;
        } else if arg == "--entry" {
            options.entry = Some(parse_address(args, arg_index + 1)?);
            arg_index += 2;
        } else if arg == "--rows" {
            options.rows = args
                .get(arg_index + 1)
                .and_then(|rows| rows.parse().ok())
                .ok_or_else(|| FrontendError::Usage("--rows needs a number".to_string()))?;
            arg_index += 2;
        } else {
            return Err(FrontendError::Usage(format!("Unknown argument: {}", arg)));
        }
    }

    Ok(options)
}

/// Everything the debugger windows are drawn from.
struct Session {
    machine: Rc<RefCell<Machine>>,
    desktop: Desktop,
    plugins: Plugins,
    paused: bool,
}

impl Session {
    fn broadcast(&mut self, event: Event) -> Result<(), FrontendError> {
        self.desktop.dispatch(event)?;
        self.plugins.dispatch(event)?;
        Ok(())
    }

    fn draw<W: Write>(&mut self, surface: &mut TextSurface<W>) -> Result<(), FrontendError> {
        self.desktop.draw(surface)?;
        self.plugins.draw(surface)?;
        surface.finish_frame()?;
        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, surface: &mut TextSurface<W>)
        -> Result<Flow, FrontendError> {
        match command {
            Command::ShowUsage => println!("{}", crate::command::usage()),
            Command::Draw => {}
            Command::Click(handle) => queue(surface, handle, Action::Press),
            Command::Toggle(handle) => queue(surface, handle, Action::Toggle),
            Command::Edit(handle, text) => queue(surface, handle, Action::Commit(text)),
            Command::Select(handle, index) => queue(surface, handle, Action::Select(index)),
            Command::Close(handle) => queue(surface, handle, Action::Close),
            Command::Frames(count) => {
                if self.paused {
                    println!("Paused, resume first or step");
                } else {
                    for _ in 0..count {
                        self.machine.borrow_mut().run_frame();
                        self.broadcast(Event::Frame)?;
                    }
                }
            }
            Command::Step => {
                self.machine.borrow_mut().step();
                self.broadcast(Event::Step)?;
            }
            Command::Pause => {
                if !self.paused {
                    self.paused = true;
                    self.broadcast(Event::GamePaused)?;
                }
            }
            Command::Resume => {
                if self.paused {
                    self.paused = false;
                    self.broadcast(Event::GameResumed)?;
                }
            }
            Command::Reset => {
                self.machine.borrow_mut().reset();
                self.broadcast(Event::GameReset)?;
            }
            Command::Quit => return Ok(Flow::Quit),
            Command::RepeatCommand(command, count) => {
                for _ in 0..count {
                    if let Flow::Quit = self.execute((*command).clone(), surface)? {
                        return Ok(Flow::Quit);
                    }
                }
            }
        }

        Ok(Flow::Continue)
    }
}

fn queue<W: Write>(surface: &mut TextSurface<W>, handle: usize, action: Action) {
    if !surface.queue(handle, action) {
        println!("No widget [{}] on screen", handle);
    }
}

fn run(options: Options) -> Result<(), FrontendError> {
    let machine = Rc::new(RefCell::new(Machine::new()));

    if let Some(path) = &options.image {
        let image = fs::read(path)?;
        info!("Loaded {} bytes at {:04x} from {}", image.len(), options.origin, path.display());

        let mut machine = machine.borrow_mut();
        machine.load(&image, options.origin);
        machine.set_entry_point(options.entry.unwrap_or(options.origin));
    } else if let Some(entry) = options.entry {
        machine.borrow_mut().set_entry_point(entry);
    }

    let mut desktop = Desktop::new();
    desktop.register_subsystem(Subsystem::Config(Rc::new(HostConfig::new(machine.clone()))));
    desktop.add(DebuggerPanel::new(desktop.config(), Rc::new(Z80)))?;

    let mut plugins = Plugins::new();
    plugins.add(Box::new(ControlPlugin::default()))?;

    let mut session = Session {
        machine,
        desktop,
        plugins,
        paused: false,
    };

    for event in [
        Event::Started,
        Event::CoreLoaded,
        Event::GameLoaded,
        Event::GameStarted,
    ] {
        session.broadcast(event)?;
    }

    let mut surface = TextSurface::new(io::stdout(), options.rows);
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        session.draw(&mut surface)?;

        print!("hcdebug> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match Command::parse(&line) {
            Ok(command) => {
                if let Flow::Quit = session.execute(command, &mut surface)? {
                    break;
                }
            }
            Err(e @ CommandError::Invalid(_)) => warn!("{}", e),
        }
    }

    for event in [Event::GameUnloaded, Event::CoreUnloaded, Event::Quit] {
        session.broadcast(event)?;
    }

    Ok(())
}
