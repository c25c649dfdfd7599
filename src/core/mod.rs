//! Migration engine.
//!
//! A file goes through four stages:
//!
//! 1. `parsers`: lower the source into a parser-neutral [`syntax::SyntaxTree`]
//! 2. `resolve`: attach every comment to the node it annotates and find the function
//! 3. `locate`: turn marker comments into insertions and removals
//! 4. `apply`: rewrite the text and record a source map
//!
//! `transform` drives the stages for a single file. `file_scanner` finds the files.

pub mod apply;
pub mod file_scanner;
pub mod locate;
pub mod marker;
pub mod parsers;
pub mod resolve;
pub mod syntax;
pub mod transform;

pub use transform::{TransformOptions, TransformResult, transform, transform_with};
