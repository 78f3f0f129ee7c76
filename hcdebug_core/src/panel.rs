use crate::lifecycle::{Event, Lifecycle};
use crate::script::ScriptValue;
use crate::ui::Surface;

use std::cell::RefCell;
use std::rc::Rc;

/// A window managed by the desktop.
pub trait Panel: Lifecycle {
    /// Window title. Doubles as the registry key when no explicit key is given.
    fn title(&self) -> &str;

    fn on_draw(&mut self, surface: &mut dyn Surface, spawner: &mut Spawner);

    /// Value exposed to scripts, if the panel is scriptable.
    fn script(&self) -> Option<ScriptValue> {
        None
    }
}

/// How the desktop holds a panel. Owned panels are dropped when the desktop
/// quits; shared panels stay alive as long as their other owner does.
pub enum PanelHandle {
    Owned(Box<dyn Panel>),
    Shared(Rc<RefCell<dyn Panel>>),
}

impl PanelHandle {
    pub fn is_owned(&self) -> bool {
        matches!(*self, PanelHandle::Owned(_))
    }

    pub fn title(&self) -> String {
        match *self {
            PanelHandle::Owned(ref panel) => panel.title().to_string(),
            PanelHandle::Shared(ref panel) => panel.borrow().title().to_string(),
        }
    }

    pub fn script(&self) -> Option<ScriptValue> {
        match *self {
            PanelHandle::Owned(ref panel) => panel.script(),
            PanelHandle::Shared(ref panel) => panel.borrow().script(),
        }
    }

    pub fn handle(&mut self, event: Event) {
        match *self {
            PanelHandle::Owned(ref mut panel) => panel.handle(event),
            PanelHandle::Shared(ref panel) => panel.borrow_mut().handle(event),
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, spawner: &mut Spawner) {
        match *self {
            PanelHandle::Owned(ref mut panel) => panel.on_draw(surface, spawner),
            PanelHandle::Shared(ref panel) => panel.borrow_mut().on_draw(surface, spawner),
        }
    }
}

impl From<Box<dyn Panel>> for PanelHandle {
    fn from(panel: Box<dyn Panel>) -> PanelHandle {
        PanelHandle::Owned(panel)
    }
}

impl From<Rc<RefCell<dyn Panel>>> for PanelHandle {
    fn from(panel: Rc<RefCell<dyn Panel>>) -> PanelHandle {
        PanelHandle::Shared(panel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelOptions {
    /// Listed in the "Views" window.
    pub top_level: bool,
    pub open: bool,
    /// Registry key. Defaults to the panel title.
    pub key: Option<String>,
}

impl Default for PanelOptions {
    fn default() -> PanelOptions {
        PanelOptions {
            top_level: true,
            open: true,
            key: None,
        }
    }
}

/// Collects panels opened while drawing. The desktop registers them once the
/// draw pass is over.
#[derive(Default)]
pub struct Spawner {
    next_id: u32,
    pending: Vec<Box<dyn Panel>>,
}

impl Spawner {
    /// A fresh id to keep titles of sibling windows unique, as in `"Memory##3"`.
    pub fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn open(&mut self, panel: Box<dyn Panel>) {
        self.pending.push(panel);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn take(&mut self) -> Vec<Box<dyn Panel>> {
        std::mem::take(&mut self.pending)
    }
}
