//! Alteration application.
//!
//! Every alteration is planned against the unmodified text first (inline or block
//! insertion, indentation, how far a removal reaches), then the planned splices run
//! from the end of the file towards its start. An edit therefore never moves the
//! coordinates of an edit still pending; only the generated positions of mapping
//! entries already recorded need to follow.

pub mod lines;
pub mod mapping;

use crate::core::locate::AlterationSet;
use crate::core::marker::{directive, starts_with_directive};
use crate::core::syntax::{Position, Range};

use lines::LineBuffer;
use mapping::MappingGenerator;

pub use mapping::source_map_to_json;

/// Indent used when a body has no line to take its indentation from.
const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Remove,
}

/// Where the generated end of a mapping lands once the splice is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    /// At a fixed column after the splice start on the same line.
    After(usize),
    /// At the start of the line following the splice start.
    NextLine,
    /// At the splice start.
    Start,
}

/// A single planned splice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    pub kind: EditKind,
    /// Position the operations are ordered by.
    pub anchor: Position,
    pub range: Range,
    pub text: String,
    /// Original position recorded in the mapping entry.
    pub original: Position,
    landing: Landing,
}

impl EditOperation {
    fn generated(&self) -> Position {
        let start = self.range.start;
        match self.landing {
            Landing::After(offset) => Position::new(start.line, start.column + offset),
            Landing::NextLine => Position::new(start.line + 1, 1),
            Landing::Start => start,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Applied {
    pub content: String,
    pub generator: MappingGenerator,
}

/// Apply `alterations` to `content`.
///
/// `source_path` names the file in the produced mapping.
pub fn apply_alterations(
    source_path: &str,
    content: &str,
    alterations: &AlterationSet,
    quote_char: char,
) -> Applied {
    let mut buffer = LineBuffer::new(content);
    let mut generator = MappingGenerator::new(source_path);

    let mut operations = plan(&buffer, alterations, &directive(quote_char));
    operations.sort_by(|a, b| b.anchor.cmp(&a.anchor));

    for operation in &operations {
        let shift = buffer.splice(operation.range.start, operation.range.end, &operation.text);
        generator.shift(&shift);
        generator.add(operation.original, operation.generated());
    }

    Applied {
        content: buffer.to_string(),
        generator,
    }
}

/// Plan every alteration against the unedited buffer.
pub fn plan(
    buffer: &LineBuffer,
    alterations: &AlterationSet,
    directive: &str,
) -> Vec<EditOperation> {
    let insertions = alterations
        .additions
        .iter()
        .filter_map(|addition| plan_insertion(buffer, addition.body, addition.origin, directive));
    let removals = alterations
        .removals
        .iter()
        .map(|range| plan_removal(buffer, *range));
    insertions.chain(removals).collect()
}

fn plan_insertion(
    buffer: &LineBuffer,
    body: Range,
    origin: Position,
    directive: &str,
) -> Option<EditOperation> {
    let brace = body.start;
    let brace_line = buffer.line(brace.line)?;
    let after_brace = brace_line.get(brace.column..).unwrap_or_default();

    if opens_with_directive(buffer, brace) {
        return None;
    }

    if !after_brace.trim().is_empty() {
        // `{ return x; }` becomes `{ "ngInject"; return x; }`
        let at = Position::new(brace.line, brace.column + 1);
        let mut text = format!(" {directive}");
        if !after_brace.starts_with(char::is_whitespace) {
            text.push(' ');
        }
        return Some(EditOperation {
            kind: EditKind::Insert,
            anchor: brace,
            range: Range::new(at, at),
            text,
            original: origin,
            landing: Landing::After(1 + directive.len()),
        });
    }

    let at = Position::new(brace.line, brace_line.len() + 1);
    let terminator = match buffer.terminator(brace.line) {
        Some(terminator) if !terminator.is_empty() => terminator,
        _ => "\n",
    };
    let indent = body_indent(buffer, body);
    Some(EditOperation {
        kind: EditKind::Insert,
        anchor: brace,
        range: Range::new(at, at),
        text: format!("{terminator}{indent}{directive}"),
        original: origin,
        landing: Landing::NextLine,
    })
}

/// True when the first statement after the brace is already the directive.
fn opens_with_directive(buffer: &LineBuffer, brace: Position) -> bool {
    let after_brace = buffer
        .line(brace.line)
        .and_then(|line| line.get(brace.column..))
        .unwrap_or_default();
    let following = (brace.line + 1..=buffer.line_count()).filter_map(|n| buffer.line(n));
    std::iter::once(after_brace)
        .chain(following)
        .map(str::trim_start)
        .find(|text| !text.is_empty())
        .is_some_and(starts_with_directive)
}

/// Smallest indentation among the non-blank lines inside `body`.
fn body_indent(buffer: &LineBuffer, body: Range) -> String {
    let closing = buffer.line(body.end.line).unwrap_or_default();
    let before_closing = closing
        .get(..body.end.column.saturating_sub(2))
        .unwrap_or_default();

    let interior = (body.start.line + 1..body.end.line).filter_map(|n| buffer.line(n));
    let closing_content = (!before_closing.trim().is_empty()).then_some(before_closing);

    let smallest = interior
        .chain(closing_content)
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .min_by_key(|indent| indent.len());

    match smallest {
        Some(indent) => indent.to_string(),
        None => {
            let outer = leading_whitespace(closing);
            let step = if outer.contains('\t') { "\t" } else { DEFAULT_INDENT };
            format!("{outer}{step}")
        }
    }
}

fn plan_removal(buffer: &LineBuffer, range: Range) -> EditOperation {
    let widened = widen_removal(buffer, range);
    EditOperation {
        kind: EditKind::Remove,
        anchor: range.start,
        range: widened,
        text: String::new(),
        original: range.end,
        landing: Landing::Start,
    }
}

/// Extend a removal over the whitespace it would otherwise leave behind.
///
/// A range that leaves only whitespace on its lines takes the whole lines with it.
/// A range that ends its line after code takes the blanks between that code and
/// itself; a range followed by code on the same line takes the blanks before that code.
fn widen_removal(buffer: &LineBuffer, range: Range) -> Range {
    if range.end.column == 1 && range.end.line > range.start.line {
        return range;
    }
    let (Some(first), Some(last)) = (buffer.line(range.start.line), buffer.line(range.end.line))
    else {
        return range;
    };

    let before = first.get(..range.start.column.saturating_sub(1)).unwrap_or_default();
    let after = last.get(range.end.column.saturating_sub(1)..).unwrap_or_default();

    if before.trim().is_empty() && after.trim().is_empty() {
        let start = Position::new(range.start.line, 1);
        let end = if range.end.line < buffer.line_count() {
            Position::new(range.end.line + 1, 1)
        } else {
            Position::new(range.end.line, last.len() + 1)
        };
        return Range::new(start, end);
    }

    if after.trim().is_empty() {
        let kept = before.trim_end().len();
        if kept < before.len() {
            return Range::new(Position::new(range.start.line, kept + 1), range.end);
        }
        return range;
    }

    let trailing = after.len() - after.trim_start().len();
    if trailing > 0 && range.is_single_line() {
        return Range::new(
            range.start,
            Position::new(range.end.line, range.end.column + trailing),
        );
    }
    range
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
