//! Windowed cursor over an ordered list.
//!
//! ```text
//!   items:  [ a  b  c  d  e  f ]          window = 4
//!                 ├────────┤
//!   shift = 1 ────┘  rows 1..=4 show b c d e
//!   current_line = 3  ──▶ highlight on `d`
//! ```
//!
//! Invariants (checked by `debug_assert` after every move):
//! - `1 ≤ current_line ≤ max(1, min(window, len))`
//! - `shift ≤ len.saturating_sub(window)`

use core::iter::{Enumerate, Skip, Take};
use core::slice::Iter;

/// Visible rows of a cursor: `(absolute index, item)` pairs.
///
/// Cloning restarts the sequence.
pub type Window<'a, T> = Take<Skip<Enumerate<Iter<'a, T>>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCursor<T> {
    items: Vec<T>,
    window: usize,
    current_line: usize,
    shift: usize,
}

impl<T> MenuCursor<T> {
    /// Cursor over `items` showing `window` rows at a time.  A zero window
    /// is treated as one row.
    pub fn new(items: Vec<T>, window: usize) -> Self {
        Self {
            items,
            window: window.max(1),
            current_line: 1,
            shift: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Highlighted row within the window, 1-indexed.
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Index of the first visible item.
    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Absolute index of the highlighted item.
    pub fn selected_index(&self) -> usize {
        self.shift + self.current_line - 1
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.selected_index())
    }

    /// The visible window, starting at `shift`.
    pub fn show(&self) -> Window<'_, T> {
        self.items.iter().enumerate().skip(self.shift).take(self.window)
    }

    /// Move the highlight down one item and return the new window.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Window<'_, T> {
        self.step_down();
        self.show()
    }

    /// Move the highlight up one item and return the new window.
    pub fn previous(&mut self) -> Window<'_, T> {
        self.step_up();
        self.show()
    }

    /// Move the highlight down one item, scrolling or wrapping as needed.
    pub fn step_down(&mut self) {
        let len = self.items.len();
        if self.current_line < self.window && self.shift + self.current_line < len {
            self.current_line += 1;
        } else if self.shift + self.window < len {
            self.shift += 1;
        } else {
            self.shift = 0;
            self.current_line = 1;
        }
        self.check_invariants();
    }

    /// Move the highlight up one item, scrolling or wrapping as needed.
    pub fn step_up(&mut self) {
        if self.current_line > 1 {
            self.current_line -= 1;
        } else if self.shift > 0 {
            self.shift -= 1;
        } else {
            self.shift = self.max_shift();
            self.current_line = self.visible_rows();
        }
        self.check_invariants();
    }

    /// Replace the backing list, pulling the cursor back into range if the
    /// list shrank.
    pub fn update(&mut self, items: Vec<T>) {
        self.items = items;
        self.shift = self.shift.min(self.max_shift());
        self.current_line = self.current_line.min(self.visible_rows());
        self.check_invariants();
    }

    /// Rows actually populated, never less than one.
    fn visible_rows(&self) -> usize {
        self.window.min(self.items.len()).max(1)
    }

    fn max_shift(&self) -> usize {
        self.items.len().saturating_sub(self.window)
    }

    fn check_invariants(&self) {
        debug_assert!(self.current_line >= 1 && self.current_line <= self.visible_rows());
        debug_assert!(self.shift <= self.max_shift());
    }
}
