//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `convert`: Replace `@ngInject` comments with `"ngInject"` directives
//! - `list`: List files that still carry `@ngInject` comments
//! - `init`: Initialize the configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Convert(cmd)) => cmd.args.common.verbose,
            Some(Command::List(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually rewrite files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Quote character of the inserted directive (overrides config file)
    #[arg(long)]
    pub quote_char: Option<char>,

    /// Compose with an existing `<file>.map` and write the updated map next to the file
    #[arg(long)]
    pub source_map: bool,
}

#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Glob pattern selecting the files to convert (overrides config includes)
    pub pattern: Option<String>,
    #[command(flatten)]
    pub args: ConvertArgs,
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Glob pattern selecting the files to search (overrides config includes)
    pub pattern: Option<String>,
    #[command(flatten)]
    pub args: ListArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace @ngInject comments with "ngInject" directive prologues
    Convert(ConvertCommand),
    /// List files that contain @ngInject comments
    List(ListCommand),
    /// Initialize a new .ngmigraterc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_arguments() {
        let args = Arguments::try_parse_from([
            "ngmigrate",
            "convert",
            "src/**/*.js",
            "--apply",
            "--quote-char",
            "'",
            "--source-map",
            "-v",
        ])
        .unwrap();

        let Some(Command::Convert(cmd)) = &args.command else {
            panic!("Expected convert command");
        };
        assert_eq!(cmd.pattern.as_deref(), Some("src/**/*.js"));
        assert!(cmd.args.apply);
        assert_eq!(cmd.args.quote_char, Some('\''));
        assert!(cmd.args.source_map);
        assert!(args.verbose());
    }

    #[test]
    fn test_parse_list_defaults() {
        let args = Arguments::try_parse_from(["ngmigrate", "list"]).unwrap();
        let Some(Command::List(cmd)) = &args.command else {
            panic!("Expected list command");
        };
        assert!(cmd.pattern.is_none());
        assert!(cmd.args.common.source_root.is_none());
        assert!(!args.verbose());
    }

    #[test]
    fn test_quote_char_must_be_single_character() {
        let result = Arguments::try_parse_from(["ngmigrate", "convert", "--quote-char", "ab"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        Arguments::command().debug_assert();
    }
}
