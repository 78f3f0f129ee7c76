//! Renders the debugger windows as plain text.
//!
//! Every interactive widget is printed with a number. Commands refer to
//! widgets by the number they had in the last frame, and the action is
//! replayed when that widget is drawn again.

use hcdebug_core::{InputKind, Surface};

use std::collections::HashMap;
use std::io::{self, Write};

const COLUMNS: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Press,
    Toggle,
    Commit(String),
    Select(usize),
    Close,
}

pub struct TextSurface<W: Write> {
    out: W,
    rows: usize,

    line: String,
    highlight: bool,
    joined: bool,
    row: usize,

    widgets: Vec<String>,
    last_widgets: Vec<String>,
    pending: HashMap<String, Action>,
    error: Option<io::Error>,
}

/// Label shown to the user, without the `##` id suffix.
pub fn visible_label(label: &str) -> &str {
    label.split("##").next().unwrap_or(label)
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W, rows: usize) -> TextSurface<W> {
        TextSurface {
            out,
            rows,
            line: String::new(),
            highlight: false,
            joined: false,
            row: 0,
            widgets: vec![],
            last_widgets: vec![],
            pending: HashMap::new(),
            error: None,
        }
    }

    /// Queues `action` for the widget numbered `handle` in the last frame.
    pub fn queue(&mut self, handle: usize, action: Action) -> bool {
        match self.last_widgets.get(handle) {
            Some(id) => {
                self.pending.insert(id.clone(), action);
                true
            }
            None => false,
        }
    }

    /// Ends a frame. Actions aimed at widgets that weren't drawn are dropped.
    /// Reports the first write that failed during the frame.
    pub fn finish_frame(&mut self) -> io::Result<()> {
        self.flush_line();
        self.last_widgets = std::mem::take(&mut self.widgets);
        self.pending.clear();

        if let Some(e) = self.error.take() {
            return Err(e);
        }

        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn widget(&mut self, id: &str, shown: &str) -> Option<Action> {
        let handle = self.widgets.len();
        self.widgets.push(id.to_string());
        self.push(&format!("[{}] {}", handle, shown));

        self.pending.remove(id)
    }

    fn push(&mut self, text: &str) {
        if !self.joined {
            self.flush_line();
        }

        if !self.line.is_empty() {
            self.line.push(' ');
        }

        self.line.push_str(text);
        self.joined = false;
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    fn flush_line(&mut self) {
        if self.line.is_empty() {
            return;
        }

        let marker = if self.highlight { '>' } else { ' ' };
        let result = writeln!(self.out, "{} {}", marker, self.line);
        self.record(result);

        self.line.clear();
        self.highlight = false;
        self.row += 1;
    }
}

impl<W: Write> Surface for TextSurface<W> {
    fn available(&self) -> [f32; 2] {
        [COLUMNS, self.rows.saturating_sub(self.row) as f32]
    }

    fn line_height(&self) -> f32 {
        1.0
    }

    fn cursor(&self) -> [f32; 2] {
        let row = if self.line.is_empty() || self.joined {
            self.row
        } else {
            self.row + 1
        };

        [self.line.len() as f32, row as f32]
    }

    fn fill_rect(&mut self, _min: [f32; 2], _max: [f32; 2]) {
        if !self.joined {
            self.flush_line();
        }

        self.highlight = true;
    }

    fn text(&mut self, text: &str) {
        self.push(text);
    }

    fn input_text(&mut self, id: &str, buffer: &mut String, kind: InputKind, read_only: bool)
        -> bool {
        let radix = match kind {
            InputKind::Hexadecimal => "hex",
            InputKind::Decimal => "dec",
        };

        if read_only {
            self.push(&format!("{} ({}, read-only)", buffer, radix));
            return false;
        }

        match self.widget(id, &format!("{} ({})", buffer, radix)) {
            Some(Action::Commit(text)) => {
                *buffer = text;
                true
            }
            _ => false,
        }
    }

    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        let mark = if *checked { 'x' } else { ' ' };

        match self.widget(label, &format!("[{}] {}", mark, visible_label(label))) {
            Some(Action::Toggle) => {
                *checked = !*checked;
                true
            }
            _ => false,
        }
    }

    fn button(&mut self, label: &str, enabled: bool) -> bool {
        if !enabled {
            self.push(&format!("<{}>", visible_label(label)));
            return false;
        }

        matches!(
            self.widget(label, &format!("<{}>", visible_label(label))),
            Some(Action::Press)
        )
    }

    fn combo(&mut self, id: &str, selected: &mut usize, items: &[&str]) -> bool {
        let listed: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if index == *selected {
                    format!("*{}: {}", index, item)
                } else {
                    format!("{}: {}", index, item)
                }
            })
            .collect();

        match self.widget(id, &format!("{{{}}}", listed.join(", "))) {
            Some(Action::Select(index)) if index < items.len() => {
                *selected = index;
                true
            }
            _ => false,
        }
    }

    fn is_item_hovered(&self) -> bool {
        false
    }

    fn tooltip(&mut self, _lines: &[String]) {}

    fn same_line(&mut self) {
        self.joined = true;
    }

    fn begin_window(&mut self, title: &str, open: Option<&mut bool>) -> bool {
        self.flush_line();
        self.row = 0;

        let shown = format!("== {} ==", visible_label(title));

        match open {
            Some(open) => {
                let close_id = format!("close##{}", title);
                let action = self.widget(&close_id, &format!("{} x", shown));

                if action == Some(Action::Close) {
                    *open = false;
                }
            }
            None => self.push(&shown),
        }

        true
    }

    fn end_window(&mut self) {
        self.flush_line();
        // blank line between windows
        let result = writeln!(self.out);
        self.record(result);
    }
}
