use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use glob::Pattern;

use super::super::args::CommonArgs;
use crate::config::{CONFIG_FILE_NAME, Config, load_config};
use crate::core::file_scanner::scan_files;

/// Configuration and file list shared by the commands that walk the project.
pub struct Project {
    pub config: Config,
    pub files: Vec<String>,
}

impl Project {
    /// Load the configuration and scan for files.
    ///
    /// Priority: CLI arguments > config file > defaults. `--source-root` decides
    /// both where the config file is searched from and which directory is scanned;
    /// without it the config's `sourceRoot` is scanned. `pattern` replaces the
    /// configured includes.
    pub fn load(common: &CommonArgs, pattern: Option<&str>) -> Result<Self> {
        let verbose = common.verbose;

        let search_dir = common
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let config_result = load_config(&search_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }
        let config = config_result.config;

        let scan_root = match &common.source_root {
            Some(root) => root.clone(),
            None => PathBuf::from(&config.source_root),
        };
        if !scan_root.exists() {
            bail!("Source root does not exist: {}", scan_root.display());
        }
        let root = scan_root
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", scan_root))?;

        let includes = match pattern {
            Some(pattern) => {
                if pattern.contains('*') || pattern.contains('?') {
                    Pattern::new(pattern)
                        .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;
                }
                vec![pattern.to_string()]
            }
            None => config.includes.clone(),
        };

        let scan = scan_files(root, &includes, &config.ignores, verbose);
        if verbose && scan.skipped_count > 0 {
            eprintln!("Note: {} path(s) could not be accessed", scan.skipped_count);
        }

        Ok(Self {
            config,
            files: scan.files,
        })
    }
}

/// `<path>.map`, the source map file that sits next to `path`.
pub fn source_map_path(path: &str) -> PathBuf {
    let mut map_path = Path::new(path).as_os_str().to_owned();
    map_path.push(".map");
    PathBuf::from(map_path)
}
