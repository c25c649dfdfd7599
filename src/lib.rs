//! ngmigrate - `@ngInject` to `"ngInject"` migration for AngularJS code
//!
//! Legacy AngularJS build pipelines recognized dependency-injected functions by an
//! `@ngInject` doc comment. Current tooling expects a `"ngInject";` directive prologue
//! inside the function body instead. ngmigrate rewrites the former into the latter,
//! keeps a source map pointing back at the original text, and reports markers it
//! cannot attach to a function.
//!
//! ```
//! use ngmigrate::core::{TransformOptions, transform};
//!
//! let options = TransformOptions {
//!     filename: "app.js".to_string(),
//!     ..Default::default()
//! };
//! let result = transform("/** @ngInject */\nfunction ctrl($scope) {}\n", &options);
//! assert_eq!(result.content, "function ctrl($scope) { \"ngInject\"; }\n");
//! ```
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`convert`, `list`, `init`)
//! - `config`: Configuration file loading and parsing
//! - `core`: Migration engine (parse, resolve, locate, apply)
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
