//! Scroll-and-select state machine for the candidate list.
//!
//! A single operational state: the list is fixed after sorting, and the only
//! things that move are the viewport start, the cursor row within the
//! viewport, and the per-item selection flags. Every input event maps to
//! exactly one transition.

use crate::types::UpgradeCandidate;

/// One discrete input event. Quit is not represented here; it mutates
/// nothing, the event loop simply stops and extracts the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    MoveDown,
    MoveUp,
    ToggleSelect,
    PageDown,
    PageUp,
    Resize(usize),
}

/// Candidate list plus viewport/cursor position.
///
/// Invariants, maintained by every transition:
/// - `cursor_offset < viewport_height`
/// - `viewport_start + cursor_offset` indexes a real item while the list is
///   non-empty
#[derive(Debug)]
pub struct SelectionState {
    items: Vec<UpgradeCandidate>,
    viewport_start: usize,
    cursor_offset: usize,
    viewport_height: usize,
}

impl SelectionState {
    pub fn new(items: Vec<UpgradeCandidate>, viewport_height: usize) -> Self {
        Self {
            items,
            viewport_start: 0,
            cursor_offset: 0,
            viewport_height: viewport_height.max(1),
        }
    }

    // === Accessors ===

    pub fn items(&self) -> &[UpgradeCandidate] {
        &self.items
    }

    pub fn viewport_start(&self) -> usize {
        self.viewport_start
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Absolute index of the cursor item.
    pub fn cursor_index(&self) -> usize {
        self.viewport_start + self.cursor_offset
    }

    pub fn cursor_item(&self) -> Option<&UpgradeCandidate> {
        self.items.get(self.cursor_index())
    }

    /// Names of the selected items, in list order, consuming the state.
    /// Called once, after the quit event ends the loop.
    pub fn into_selected_names(self) -> Vec<String> {
        self.items
            .into_iter()
            .filter(|c| c.selected)
            .map(|c| c.record.name)
            .collect()
    }

    // === Transitions ===

    pub fn apply(&mut self, event: SelectionEvent) {
        if self.items.is_empty() {
            if let SelectionEvent::Resize(height) = event {
                self.viewport_height = height.max(1);
            }
            return;
        }
        match event {
            SelectionEvent::MoveDown => self.move_down(),
            SelectionEvent::MoveUp => self.move_up(),
            SelectionEvent::ToggleSelect => self.toggle_select(),
            SelectionEvent::PageDown => self.page_down(),
            SelectionEvent::PageUp => self.page_up(),
            SelectionEvent::Resize(height) => self.resize(height),
        }
    }

    fn move_down(&mut self) {
        if self.cursor_index() + 1 >= self.items.len() {
            return; // already on the last item
        }
        let at_bottom_row = self.cursor_offset + 1 == self.viewport_height;
        let more_below = self.viewport_start + self.viewport_height < self.items.len();
        if at_bottom_row && more_below {
            self.viewport_start += 1;
        } else if self.cursor_offset + 1 < self.viewport_height.min(self.items.len()) {
            self.cursor_offset += 1;
        }
    }

    fn move_up(&mut self) {
        if self.cursor_index() == 0 {
            return;
        }
        if self.cursor_offset == 0 {
            self.viewport_start -= 1;
        } else {
            self.cursor_offset -= 1;
        }
    }

    fn toggle_select(&mut self) {
        let index = self.cursor_index();
        self.items[index].selected = !self.items[index].selected;
        self.move_down();
    }

    fn page_down(&mut self) {
        self.viewport_start += self.viewport_height / 2;
        self.clamp_after_shift();
    }

    fn page_up(&mut self) {
        self.viewport_start = self
            .viewport_start
            .saturating_sub(self.viewport_height / 2);
        self.clamp_after_shift();
    }

    fn resize(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.cursor_offset = self
            .cursor_offset
            .min(self.viewport_height - 1)
            .min(self.items.len() - 1 - self.viewport_start);
    }

    /// Pull both fields back into range after a bulk viewport shift.
    fn clamp_after_shift(&mut self) {
        let max_start = self.items.len().saturating_sub(self.viewport_height);
        self.viewport_start = self.viewport_start.min(max_start);
        self.cursor_offset = self
            .cursor_offset
            .min(self.viewport_height - 1)
            .min(self.items.len() - 1 - self.viewport_start);
    }
}
