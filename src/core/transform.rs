//! Single-file migration entry point.
//!
//! `transform` is a two-state machine. Input without the marker tag bypasses the
//! pipeline entirely; anything else is parsed, resolved, located and, when there is
//! something to change, rewritten with a source map composed on top of the input one.

use std::collections::HashSet;

use sourcemap::SourceMap;

use crate::core::apply::apply_alterations;
use crate::core::apply::mapping::mapped_lines;
use crate::core::locate::{AlterationError, find_alterations};
use crate::core::marker::contains_marker;
use crate::core::parsers::{SwcParser, SyntaxParser};
use crate::core::resolve::{Annotations, Resolver};
use crate::core::syntax::SyntaxNode;
use crate::issues::{ParseErrorIssue, TransformIssue, UnresolvedAnnotationIssue};

#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Reported in issues and in the produced source map. Its extension selects the grammar.
    pub filename: String,
    /// Map of a previous stage that produced `content`.
    pub source_map: Option<SourceMap>,
    pub quote_char: char,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            filename: String::new(),
            source_map: None,
            quote_char: '"',
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub is_changed: bool,
    pub content: String,
    /// The input map when nothing changed, otherwise the composed map.
    pub source_map: Option<SourceMap>,
    pub errors: Vec<TransformIssue>,
}

impl TransformResult {
    fn unchanged(content: &str, options: &TransformOptions, errors: Vec<TransformIssue>) -> Self {
        Self {
            is_changed: false,
            content: content.to_string(),
            source_map: options.source_map.clone(),
            errors,
        }
    }
}

/// Migrate `content` with the swc parser.
pub fn transform(content: &str, options: &TransformOptions) -> TransformResult {
    transform_with(&SwcParser, content, options)
}

/// Migrate `content` using `parser` to build the syntax tree.
pub fn transform_with<P: SyntaxParser + ?Sized>(
    parser: &P,
    content: &str,
    options: &TransformOptions,
) -> TransformResult {
    if !contains_marker(content) {
        return TransformResult::unchanged(content, options, Vec::new());
    }

    let tree = match parser.parse(content, &options.filename) {
        Ok(tree) => tree,
        Err(e) => {
            let issue = TransformIssue::ParseError(ParseErrorIssue {
                file_path: options.filename.clone(),
                error: e.to_string(),
            });
            return TransformResult::unchanged(content, options, vec![issue]);
        }
    };

    // Lines the previous stage has no mapping for were written by a transpiler.
    let mapped: Option<HashSet<u32>> = options.source_map.as_ref().map(mapped_lines);
    let is_generated = |node: &SyntaxNode| {
        parser.is_generated(node)
            || mapped.as_ref().is_some_and(|lines| {
                let line = node.range.start.line.saturating_sub(1);
                !u32::try_from(line).is_ok_and(|line| lines.contains(&line))
            })
    };

    let annotations = Annotations::associate(&tree);
    let resolver = Resolver::new(&tree, &annotations, &is_generated);
    let alterations = find_alterations(&resolver);

    let errors: Vec<TransformIssue> = alterations
        .errors
        .iter()
        .map(|error| unresolved_issue(content, &options.filename, error))
        .collect();

    if !alterations.has_change {
        return TransformResult::unchanged(content, options, errors);
    }

    let applied = apply_alterations(
        &options.filename,
        content,
        &alterations,
        options.quote_char,
    );
    let source_map = match &options.source_map {
        Some(input) => applied.generator.apply_source_map(input),
        None => applied.generator.to_source_map(),
    };

    TransformResult {
        is_changed: applied.content != content,
        content: applied.content,
        source_map: Some(source_map),
        errors,
    }
}

fn unresolved_issue(content: &str, filename: &str, error: &AlterationError) -> TransformIssue {
    let source_line = content
        .lines()
        .nth(error.position.line.saturating_sub(1))
        .unwrap_or_default()
        .to_string();
    TransformIssue::UnresolvedAnnotation(UnresolvedAnnotationIssue {
        file_path: filename.to_string(),
        position: error.position,
        reason: error.reason,
        source_line,
    })
}
