//! Line-oriented text buffer addressed by 1-based positions.

use std::fmt;

use crate::core::syntax::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    content: String,
    /// `"\n"`, `"\r\n"` or empty for the last line.
    terminator: String,
}

/// The text as a sequence of (content, terminator) pairs.
///
/// Joining an unedited buffer reproduces the input byte for byte. The last line
/// never has a terminator, so a text ending in a newline has an empty last line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Line>,
}

/// How positions at or after an edited range move once the edit is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub start: Position,
    /// End of the replaced range, before the edit.
    pub end: Position,
    /// End of the inserted text, after the edit.
    pub new_end: Position,
}

impl Shift {
    /// Translate a pre-edit position into the edited buffer.
    pub fn apply(&self, position: Position) -> Position {
        if position < self.start {
            position
        } else if position < self.end {
            self.start
        } else if position.line == self.end.line {
            Position::new(
                self.new_end.line,
                self.new_end.column + (position.column - self.end.column),
            )
        } else {
            Position::new(
                position.line - self.end.line + self.new_end.line,
                position.column,
            )
        }
    }
}

impl LineBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            lines: split_lines(text, true),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Content of line `number` (1-based) without its terminator.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(|line| line.content.as_str())
    }

    /// Terminator of line `number`, empty for the last line.
    pub fn terminator(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(|line| line.terminator.as_str())
    }

    /// Replace the text between `start` and `end` with `text`.
    ///
    /// Positions are clamped to the buffer. A column past the end of a line stops at
    /// the line end: terminators are only crossed by ranges that end on a later line.
    pub fn splice(&mut self, start: Position, end: Position, text: &str) -> Shift {
        let start = self.clamp(start);
        let end = self.clamp(end).max(start);

        let first = start.line - 1;
        let last = end.line - 1;
        let mut joined = String::new();
        let mut end_offset = 0;
        for (i, line) in self.lines[first..=last].iter().enumerate() {
            if first + i == last {
                end_offset = joined.len() + end.column - 1;
            }
            joined.push_str(&line.content);
            joined.push_str(&line.terminator);
        }
        let start_offset = start.column - 1;

        joined.replace_range(start_offset..end_offset, text);
        let is_tail = last + 1 == self.lines.len();
        self.lines
            .splice(first..=last, split_lines(&joined, is_tail));

        Shift {
            start,
            end,
            new_end: advance(start, text),
        }
    }

    fn clamp(&self, position: Position) -> Position {
        let line = position.line.clamp(1, self.lines.len());
        let content = &self.lines[line - 1].content;
        let mut offset = if position.line > self.lines.len() {
            content.len()
        } else {
            position.column.saturating_sub(1).min(content.len())
        };
        while !content.is_char_boundary(offset) {
            offset -= 1;
        }
        Position::new(line, offset + 1)
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(&line.content)?;
            f.write_str(&line.terminator)?;
        }
        Ok(())
    }
}

/// Position reached after writing `text` starting at `start`.
fn advance(start: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(i) => Position::new(start.line + text.matches('\n').count(), text.len() - i),
        None => Position::new(start.line, start.column + text.len()),
    }
}

/// Split into lines. With `is_tail` the result ends with an unterminated line, which
/// is empty when `text` ends in a newline.
fn split_lines(text: &str, is_tail: bool) -> Vec<Line> {
    let mut lines: Vec<Line> = text
        .split_inclusive('\n')
        .map(|piece| {
            let content = piece
                .strip_suffix("\r\n")
                .or_else(|| piece.strip_suffix('\n'));
            match content {
                Some(content) => Line {
                    content: content.to_string(),
                    terminator: piece[content.len()..].to_string(),
                },
                None => Line {
                    content: piece.to_string(),
                    terminator: String::new(),
                },
            }
        })
        .collect();

    let ends_open = lines.last().is_some_and(|line| line.terminator.is_empty());
    if is_tail && !ends_open {
        lines.push(Line {
            content: String::new(),
            terminator: String::new(),
        });
    }
    lines
}
