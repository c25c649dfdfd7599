//! Mapping entries recorded while editing, and their source map form.

use std::collections::HashSet;

use anyhow::{Context, Result};
use sourcemap::{SourceMap, SourceMapBuilder};

use crate::core::apply::lines::Shift;
use crate::core::syntax::Position;

/// One edit traced back to the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    /// Index into `MappingGenerator::sources`.
    pub source: u32,
    pub original: Position,
    pub generated: Position,
}

/// Accumulates mapping entries for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingGenerator {
    file: String,
    sources: Vec<String>,
    entries: Vec<MappingEntry>,
}

impl MappingGenerator {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            sources: vec![file.to_string()],
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Record an edit of the file itself.
    pub fn add(&mut self, original: Position, generated: Position) {
        self.entries.push(MappingEntry {
            source: 0,
            original,
            generated,
        });
    }

    /// Move generated positions of already recorded entries past a new edit.
    pub fn shift(&mut self, shift: &Shift) {
        for entry in &mut self.entries {
            entry.generated = shift.apply(entry.generated);
        }
    }

    /// Build a version 3 source map from the recorded entries.
    pub fn to_source_map(&self) -> SourceMap {
        let mut builder = SourceMapBuilder::new(Some(&self.file));
        for entry in self.sorted_entries() {
            builder.add(
                zero_based(entry.generated.line),
                zero_based(entry.generated.column),
                zero_based(entry.original.line),
                zero_based(entry.original.column),
                self.sources.get(entry.source as usize).map(String::as_str),
                None,
                false,
            );
        }
        builder.into_sourcemap()
    }

    /// Compose the recorded entries on top of `input`, the map of the text this
    /// generator's original positions refer to.
    ///
    /// Entries whose original line is mapped by `input` resolve to the position
    /// `input` gives; entries on unmapped lines keep pointing at this file.
    pub fn apply_source_map(&self, input: &SourceMap) -> SourceMap {
        let mut builder = SourceMapBuilder::new(Some(&self.file));
        for entry in self.sorted_entries() {
            let dst_line = zero_based(entry.generated.line);
            let dst_col = zero_based(entry.generated.column);
            let line = zero_based(entry.original.line);
            let column = zero_based(entry.original.column);

            match input
                .lookup_token(line, column)
                .filter(|token| token.get_dst_line() == line)
            {
                Some(token) => {
                    builder.add(
                        dst_line,
                        dst_col,
                        token.get_src_line(),
                        token.get_src_col(),
                        token.get_source(),
                        token.get_name(),
                        false,
                    );
                }
                None => {
                    builder.add(
                        dst_line,
                        dst_col,
                        line,
                        column,
                        self.sources.get(entry.source as usize).map(String::as_str),
                        None,
                        false,
                    );
                }
            }
        }
        builder.into_sourcemap()
    }

    fn sorted_entries(&self) -> Vec<MappingEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|entry| (entry.generated, entry.original));
        entries
    }
}

/// Serialize any source map as JSON.
pub fn source_map_to_json(map: &SourceMap) -> Result<String> {
    let mut bytes = Vec::new();
    map.to_writer(&mut bytes)
        .context("Failed to serialize source map")?;
    String::from_utf8(bytes).context("Source map is not valid UTF-8")
}

/// Zero-based lines of `map` that carry at least one mapping.
pub fn mapped_lines(map: &SourceMap) -> HashSet<u32> {
    map.tokens().map(|token| token.get_dst_line()).collect()
}

fn zero_based(value: usize) -> u32 {
    u32::try_from(value.saturating_sub(1)).unwrap_or(u32::MAX)
}
