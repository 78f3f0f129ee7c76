//! The immediate-mode drawing surface panels render into.
//!
//! Positions are in surface units, `[x, y]`, with `y` growing downwards. Widgets
//! are laid out one after another; `same_line` keeps the next widget on the
//! current line.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Hexadecimal,
    Decimal,
}

pub trait Surface {
    /// Size of the space left in the current window.
    fn available(&self) -> [f32; 2];
    /// Height of a line of text including spacing.
    fn line_height(&self) -> f32;
    fn cursor(&self) -> [f32; 2];

    /// Fills a rectangle with the frame highlight color.
    fn fill_rect(&mut self, min: [f32; 2], max: [f32; 2]);

    fn text(&mut self, text: &str);
    /// Returns `true` when the user commits an edit of `buffer`.
    fn input_text(&mut self, id: &str, buffer: &mut String, kind: InputKind, read_only: bool)
        -> bool;
    /// Returns `true` when the user flipped `checked` this frame.
    fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool;
    fn button(&mut self, label: &str, enabled: bool) -> bool;
    fn combo(&mut self, id: &str, selected: &mut usize, items: &[&str]) -> bool;

    /// Whether the last widget is under the pointer.
    fn is_item_hovered(&self) -> bool;
    fn tooltip(&mut self, lines: &[String]);

    fn same_line(&mut self) {}

    /// Starts a window. With `open`, the window gets a close box that clears the
    /// flag. Returns `false` when the window is collapsed.
    fn begin_window(&mut self, title: &str, open: Option<&mut bool>) -> bool;
    fn end_window(&mut self);
}
