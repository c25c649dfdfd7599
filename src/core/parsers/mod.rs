//! Syntax parser collaborators.
//!
//! The migration engine never touches a concrete AST. A parser lowers source text into
//! a [`SyntaxTree`] and decides which nodes count as generated (synthetic) code.
//!
//! - `js`: JavaScript/TypeScript parser backed by swc

pub mod js;

use anyhow::Result;

use crate::core::syntax::{SyntaxNode, SyntaxTree};

pub use js::SwcParser;

pub trait SyntaxParser {
    /// Parse `content` into a tree with 1-based positions and all comments.
    fn parse(&self, content: &str, filename: &str) -> Result<SyntaxTree>;

    /// Whether a node was synthesized rather than written in the source.
    ///
    /// Generated nodes are skipped when associating a comment with the code it annotates.
    fn is_generated(&self, node: &SyntaxNode) -> bool {
        node.synthetic
    }
}
