//! Alteration discovery.
//!
//! Walks the marker comments of a resolved tree and decides which function bodies
//! receive the directive and which comment ranges are deleted. Nothing here touches
//! the text: every range is measured against the unmodified input.

use std::collections::HashSet;

use crate::core::marker::{contains_marker, is_pure_marker};
use crate::core::resolve::{Resolution, Resolver, UnresolvedReason};
use crate::core::syntax::{Comment, CommentKind, NodeId, Position, Range};

/// A function body that needs the directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addition {
    /// The `{ ... }` body of the annotated function.
    pub body: Range,
    /// Start of the marker comment that asked for the directive.
    pub origin: Position,
}

/// A marker comment that annotates nothing. The comment stays in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterationError {
    /// Index of the comment in `SyntaxTree::comments`.
    pub comment: usize,
    pub position: Position,
    pub reason: UnresolvedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlterationSet {
    pub errors: Vec<AlterationError>,
    pub additions: Vec<Addition>,
    pub removals: Vec<Range>,
    pub has_change: bool,
}

/// Collect the additions and removals implied by every marker comment.
pub fn find_alterations(resolver: &Resolver<'_>) -> AlterationSet {
    let tree = resolver.tree();
    let mut set = AlterationSet::default();
    let mut targeted: HashSet<NodeId> = HashSet::new();

    for (index, comment) in tree.comments.iter().enumerate() {
        if !contains_marker(&comment.text) {
            continue;
        }

        let function = match resolver.resolve(index) {
            Resolution::Resolved(function) => function,
            Resolution::Unresolved(reason) => {
                set.errors.push(AlterationError {
                    comment: index,
                    position: comment.range.start,
                    reason,
                });
                continue;
            }
        };

        // A function targeted twice still gets a single directive.
        if targeted.insert(function) {
            if let Some(body) = tree.node(function).body {
                set.additions.push(Addition {
                    body,
                    origin: comment.range.start,
                });
            }
        }

        set.removals.extend(removal_ranges(comment));
    }

    set.has_change = !set.additions.is_empty() || !set.removals.is_empty();
    set
}

/// Ranges to delete for one marker comment.
///
/// A pure comment goes entirely. In a mixed comment only the lines that hold the tag
/// alone are deleted; the opener and closer always survive.
pub fn removal_ranges(comment: &Comment) -> Vec<Range> {
    if is_pure_marker(&comment.text) {
        return vec![comment.range];
    }
    if comment.kind == CommentKind::Line {
        return Vec::new();
    }

    let lines: Vec<&str> = comment.text.split('\n').collect();
    let last = lines.len() - 1;
    let text_start = comment.text_start();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_pure_marker(line))
        .map(|(i, line)| {
            let line_number = text_start.line + i;
            let content = line.strip_suffix('\r').unwrap_or(line);
            if i == 0 {
                // Keep `/**`: only the text after the leading stars goes.
                let stars = content.len() - content.trim_start_matches('*').len();
                Range::new(
                    Position::new(line_number, text_start.column + stars),
                    Position::new(line_number, text_start.column + content.len()),
                )
            } else if i == last {
                let indent = content.len() - content.trim_start().len();
                Range::new(
                    Position::new(line_number, 1 + indent),
                    Position::new(line_number, 1 + content.len()),
                )
            } else {
                Range::new(
                    Position::new(line_number, 1),
                    Position::new(line_number + 1, 1),
                )
            }
        })
        .collect()
}
