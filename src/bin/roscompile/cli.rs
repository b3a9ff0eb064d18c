//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use roscompile::util::shell::ColorChoice;

/// roscompile - keep ROS package metadata in sync with the code
#[derive(Parser)]
#[command(name = "roscompile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring of status output
    #[arg(long, global = true, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files of each package by category
    Files(FilesArgs),

    /// Show the dependencies found in each package
    Depends(DependsArgs),

    /// Add missing dependencies and plugin registrations to the manifests
    Update(UpdateArgs),

    /// Register exported plugin classes only
    Plugins(PluginsArgs),

    /// List or update maintainers and authors
    People(PeopleArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Args)]
pub struct FilesArgs {
    /// Package or workspace directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Only list files that match no category
    #[arg(long)]
    pub unclassified: bool,
}

#[derive(Args)]
pub struct DependsArgs {
    /// Package or workspace directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Show run dependencies (from launch files) instead of build dependencies
    #[arg(long)]
    pub run: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Package or workspace directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Also generate setup.py for packages with python modules
    #[arg(long)]
    pub setup: bool,

    /// Report files that match no category
    #[arg(long)]
    pub extras: bool,
}

#[derive(Args)]
pub struct PluginsArgs {
    /// Package or workspace directory (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct PeopleArgs {
    /// Package or workspace directory (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Rename a person, as OLD=NEW (repeatable)
    #[arg(long, value_name = "OLD=NEW", value_parser = parse_replacement)]
    pub replace: Vec<(String, String)>,

    /// Write the merged names and emails back to every manifest
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_replacement(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.trim().is_empty() && !new.trim().is_empty() => {
            Ok((old.trim().to_string(), new.trim().to_string()))
        }
        _ => Err(format!("invalid replacement '{}'; expected OLD=NEW", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_replacement() {
        assert_eq!(
            parse_replacement("J. Doe = Jane Doe").unwrap(),
            ("J. Doe".to_string(), "Jane Doe".to_string())
        );
        assert!(parse_replacement("nobody").is_err());
        assert!(parse_replacement("=x").is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["roscompile", "depends", "--run", "--message-format", "json"])
            .unwrap();
        assert_eq!(cli.message_format, MessageFormat::Json);
        match cli.command {
            Commands::Depends(args) => assert!(args.run),
            _ => panic!("expected depends"),
        }
    }
}
