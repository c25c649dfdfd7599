//! List command - Show the files that still carry `@ngInject` comments.

use std::fs;

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::super::{args::ListCommand, exit_status::ExitStatus, report};
use super::helper::Project;
use crate::core::marker::contains_marker;

pub fn list(cmd: ListCommand, verbose: bool) -> Result<ExitStatus> {
    let project = Project::load(&cmd.args.common, cmd.pattern.as_deref())?;

    let matches: Vec<Option<String>> = project
        .files
        .par_iter()
        .map(|path| -> Result<Option<String>> {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            Ok(contains_marker(&content).then(|| path.clone()))
        })
        .collect::<Result<_>>()?;
    let files: Vec<String> = matches.into_iter().flatten().collect();

    if verbose {
        eprintln!("Note: searched {} file(s)", project.files.len());
    }
    report::print_listed(&files, project.files.len());

    Ok(ExitStatus::Success)
}
