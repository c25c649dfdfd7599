//! Convert command - Replace `@ngInject` comments with `"ngInject"` directives.
//!
//! Every scanned file runs through the migration engine in parallel. Files whose
//! markers cannot be resolved keep those comments and are reported as warnings;
//! files that fail to parse are left untouched.
//!
//! Use `--apply` to write the converted files (default is dry-run).

use std::fs;

use anyhow::{Context, Result};
use rayon::prelude::*;
use sourcemap::SourceMap;

use super::super::{
    args::ConvertCommand,
    exit_status::ExitStatus,
    report::{self, ConversionSummary},
};
use super::helper::{Project, source_map_path};
use crate::{
    config::validate_quote_char,
    core::{
        TransformOptions, TransformResult, apply::source_map_to_json, marker::contains_marker,
        transform,
    },
    issues::{Severity, TransformIssue},
};

struct ConvertSettings {
    apply: bool,
    quote_char: char,
    source_maps: bool,
}

struct FileConversion {
    path: String,
    result: TransformResult,
    map_written: bool,
}

pub fn convert(cmd: ConvertCommand, verbose: bool) -> Result<ExitStatus> {
    let args = &cmd.args;
    let project = Project::load(&args.common, cmd.pattern.as_deref())?;

    let quote_char = args.quote_char.unwrap_or(project.config.quote_char);
    validate_quote_char(quote_char)?;
    let settings = ConvertSettings {
        apply: args.apply,
        quote_char,
        source_maps: args.source_map || project.config.source_maps,
    };

    let outcomes: Vec<Result<FileConversion>> = project
        .files
        .par_iter()
        .map(|path| convert_file(path, &settings))
        .collect();

    let mut issues: Vec<TransformIssue> = Vec::new();
    let mut converted: Vec<String> = Vec::new();
    let mut maps_written = 0;
    let mut file_error_count = 0;
    for outcome in outcomes {
        match outcome {
            Ok(conversion) => {
                if conversion.result.is_changed {
                    converted.push(conversion.path);
                }
                if conversion.map_written {
                    maps_written += 1;
                }
                issues.extend(conversion.result.errors);
            }
            Err(err) => {
                file_error_count += 1;
                report::print_file_error(&err);
            }
        }
    }

    let parse_error_count = issues
        .iter()
        .filter(|issue| matches!(issue, TransformIssue::ParseError(_)))
        .count();

    // Parse errors are only listed in verbose mode; otherwise they are counted.
    let shown: Vec<TransformIssue> = issues
        .iter()
        .filter(|issue| verbose || !matches!(issue, TransformIssue::ParseError(_)))
        .cloned()
        .collect();
    report::report(&shown);

    report::print_conversion(&ConversionSummary {
        is_apply: settings.apply,
        converted: converted.clone(),
        maps_written,
    });
    if issues.is_empty() && converted.is_empty() && file_error_count == 0 {
        report::print_success(project.files.len());
    }
    report::print_parse_warning(parse_error_count, verbose);

    let has_errors =
        file_error_count > 0 || issues.iter().any(|i| i.severity() == Severity::Error);
    let has_pending = !settings.apply && !converted.is_empty();
    let status = if has_errors {
        ExitStatus::Error
    } else if !issues.is_empty() || has_pending {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    };
    Ok(status)
}

fn convert_file(path: &str, settings: &ConvertSettings) -> Result<FileConversion> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;

    let map_path = source_map_path(path);
    let source_map = if settings.source_maps && contains_marker(&content) && map_path.exists() {
        let bytes = fs::read(&map_path)
            .with_context(|| format!("Failed to read source map: {}", map_path.display()))?;
        let map = SourceMap::from_slice(&bytes)
            .with_context(|| format!("Failed to parse source map: {}", map_path.display()))?;
        Some(map)
    } else {
        None
    };

    let options = TransformOptions {
        filename: path.to_string(),
        source_map,
        quote_char: settings.quote_char,
    };
    let result = transform(&content, &options);

    let mut map_written = false;
    if settings.apply && result.is_changed {
        fs::write(path, &result.content)
            .with_context(|| format!("Failed to write file: {}", path))?;

        if settings.source_maps
            && let Some(map) = &result.source_map
        {
            fs::write(&map_path, source_map_to_json(map)?)
                .with_context(|| format!("Failed to write source map: {}", map_path.display()))?;
            map_written = true;
        }
    }

    Ok(FileConversion {
        path: path.to_string(),
        result,
        map_written,
    })
}
