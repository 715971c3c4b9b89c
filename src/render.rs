//! Rendering contract between the selection state and the terminal surface.
//!
//! Pure helpers only: which rows are visible, which visual attributes each
//! row carries, and how the cursor item's description wraps into the side
//! region. The terminal side maps these onto its own style type.

use crate::select::SelectionState;

/// Visual attributes of one row. `selected` and `cursor` are independent;
/// a row can carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAttrs {
    pub selected: bool,
    pub cursor: bool,
}

/// One viewport row ready for drawing.
#[derive(Debug, PartialEq, Eq)]
pub struct RowView {
    /// Row position within the viewport.
    pub row: usize,
    /// Name cell, already padded/truncated to the column boundary.
    pub text: String,
    pub attrs: RowAttrs,
}

/// Rows of the current viewport that hold a valid item, top to bottom.
pub fn visible_rows(state: &SelectionState, name_width: usize) -> Vec<RowView> {
    let items = state.items();
    (0..state.viewport_height())
        .filter_map(|row| {
            let item = items.get(state.viewport_start() + row)?;
            Some(RowView {
                row,
                text: pad_name(&item.record.name, name_width),
                attrs: RowAttrs {
                    selected: item.selected,
                    cursor: row == state.cursor_offset(),
                },
            })
        })
        .collect()
}

/// Left-aligned name cell: space-filled to `width`, truncated when longer,
/// so row attributes span the whole column.
pub fn pad_name(name: &str, width: usize) -> String {
    let mut cell: String = name.chars().take(width).collect();
    for _ in cell.chars().count()..width {
        cell.push(' ');
    }
    cell
}

/// Word-wrap `text` into lines at most `width` wide where possible: split on
/// whitespace, and when appending the next word would exceed the width, start
/// a new line instead of breaking the word. A word longer than `width` gets a
/// line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SelectionEvent;
    use crate::types::{PackageRecord, UpgradeCandidate};

    fn state_with(names: &[&str], height: usize) -> SelectionState {
        let items = names
            .iter()
            .map(|name| {
                UpgradeCandidate::new(PackageRecord {
                    name: (*name).to_string(),
                    installed_size: 1,
                    description: String::from("desc"),
                    depends: Vec::new(),
                })
            })
            .collect();
        SelectionState::new(items, height)
    }

    #[test]
    fn pad_name_fills_and_truncates() {
        assert_eq!(pad_name("abc", 6), "abc   ");
        assert_eq!(pad_name("abcdef", 6), "abcdef");
        assert_eq!(pad_name("abcdefgh", 6), "abcdef");
        assert_eq!(pad_name("", 3), "   ");
    }

    #[test]
    fn visible_rows_skip_rows_past_the_list() {
        let s = state_with(&["a", "b"], 5);
        let rows = visible_rows(&s, 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "a   ");
        assert!(rows[0].attrs.cursor);
        assert!(!rows[1].attrs.cursor);
    }

    #[test]
    fn cursor_and_selected_attributes_are_independent() {
        let mut s = state_with(&["a", "b", "c"], 3);
        s.apply(SelectionEvent::ToggleSelect); // select "a", cursor moves to "b"
        let rows = visible_rows(&s, 2);
        assert_eq!(rows[0].attrs, RowAttrs { selected: true, cursor: false });
        assert_eq!(rows[1].attrs, RowAttrs { selected: false, cursor: true });
        assert_eq!(rows[2].attrs, RowAttrs { selected: false, cursor: false });
    }

    #[test]
    fn wrap_never_splits_words() {
        let lines = wrap_words("a quick brown fox jumps", 11);
        assert_eq!(lines, vec!["a quick", "brown fox", "jumps"]);
        for line in &lines {
            assert!(line.len() <= 11);
        }
    }

    #[test]
    fn wrap_gives_overlong_word_its_own_line() {
        let lines = wrap_words("tiny enormousmodulename end", 8);
        assert_eq!(lines, vec!["tiny", "enormousmodulename", "end"]);
    }

    #[test]
    fn wrap_collapses_whitespace_runs() {
        let lines = wrap_words("  spaced\t\tout   text ", 20);
        assert_eq!(lines, vec!["spaced out text"]);
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        assert!(wrap_words("", 10).is_empty());
        assert!(wrap_words("   ", 10).is_empty());
    }
}
