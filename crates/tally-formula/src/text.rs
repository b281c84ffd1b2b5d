//! Editable text buffers
//!
//! [`TextEditable`] implements every index-based edit once, on top of two
//! primitives: reading the current text and committing an edited copy.
//! Indices count `char`s, not bytes.

use crate::error::{FormulaError, FormulaResult};
use std::ops::Range;

/// Text buffer with bounds-checked, atomic edits
///
/// Every edit is applied to a copy of the text; the copy is committed only when
/// the edit succeeds, so a failed edit leaves the buffer untouched.
pub trait TextEditable {
    /// Current text
    fn text(&self) -> String;

    /// Apply `edit` to a copy of the text and commit the copy if it succeeds
    fn modify<F>(&mut self, edit: F) -> FormulaResult<()>
    where
        F: FnOnce(&mut String) -> FormulaResult<()>;

    /// Number of characters
    fn len(&self) -> usize {
        self.text().chars().count()
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Replace the whole text
    fn set(&mut self, text: &str) -> FormulaResult<()> {
        self.modify(|buffer| {
            buffer.clear();
            buffer.push_str(text);
            Ok(())
        })
    }

    fn clear(&mut self) -> FormulaResult<()> {
        self.modify(|buffer| {
            buffer.clear();
            Ok(())
        })
    }

    /// Append a character
    fn push(&mut self, ch: char) -> FormulaResult<()> {
        self.modify(|buffer| {
            buffer.push(ch);
            Ok(())
        })
    }

    /// Append a string
    fn push_str(&mut self, text: &str) -> FormulaResult<()> {
        self.modify(|buffer| {
            buffer.push_str(text);
            Ok(())
        })
    }

    /// Insert a character before `index`; `index == len()` appends
    fn insert(&mut self, index: usize, ch: char) -> FormulaResult<()> {
        self.modify(|buffer| {
            let at = byte_range(buffer, index, index)?.start;
            buffer.insert(at, ch);
            Ok(())
        })
    }

    /// Insert a string before `index`; `index == len()` appends
    fn insert_str(&mut self, index: usize, text: &str) -> FormulaResult<()> {
        self.modify(|buffer| {
            let at = byte_range(buffer, index, index)?.start;
            buffer.insert_str(at, text);
            Ok(())
        })
    }

    /// Delete the last character
    fn pop(&mut self) -> FormulaResult<()> {
        self.modify(|buffer| {
            buffer
                .pop()
                .map(|_| ())
                .ok_or(FormulaError::OutOfBounds { start: 0, end: 1, len: 0 })
        })
    }

    /// Delete the character at `index`
    fn remove(&mut self, index: usize) -> FormulaResult<()> {
        self.remove_range(index, index.saturating_add(1))
    }

    /// Delete the characters in `start..end`
    fn remove_range(&mut self, start: usize, end: usize) -> FormulaResult<()> {
        self.replace_range(start, end, "")
    }

    /// Replace the character at `index`
    fn replace_char(&mut self, index: usize, ch: char) -> FormulaResult<()> {
        let mut encoded = [0u8; 4];
        self.replace_range(index, index.saturating_add(1), ch.encode_utf8(&mut encoded))
    }

    /// Replace the characters in `start..end` with `text`
    fn replace_range(&mut self, start: usize, end: usize, text: &str) -> FormulaResult<()> {
        self.modify(|buffer| {
            let range = byte_range(buffer, start, end)?;
            buffer.replace_range(range, text);
            Ok(())
        })
    }

    /// Character at `index`
    fn char_at(&self, index: usize) -> FormulaResult<char> {
        let text = self.text();
        let len = text.chars().count();
        text.chars().nth(index).ok_or(FormulaError::OutOfBounds {
            start: index,
            end: index.saturating_add(1),
            len,
        })
    }

    /// Characters in `start..end`
    fn sub_sequence(&self, start: usize, end: usize) -> FormulaResult<String> {
        let text = self.text();
        let range = byte_range(&text, start, end)?;
        Ok(text[range].to_string())
    }
}

/// Byte range for the character range `start..end`, checked against the text
pub(crate) fn byte_range(text: &str, start: usize, end: usize) -> FormulaResult<Range<usize>> {
    let len = text.chars().count();
    if start > end || end > len {
        return Err(FormulaError::OutOfBounds { start, end, len });
    }
    Ok(byte_offset(text, start)..byte_offset(text, end))
}

fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset)
}
