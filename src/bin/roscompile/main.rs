//! roscompile CLI - keep ROS package metadata in sync with the code

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use roscompile::util::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color.into(),
        cli.message_format == MessageFormat::Json,
    );

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("roscompile=debug")
    } else if cli.quiet {
        EnvFilter::new("roscompile=error")
    } else {
        EnvFilter::new("roscompile=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Files(args) => commands::files::execute(args, &shell),
        Commands::Depends(args) => commands::depends::execute(args, &shell),
        Commands::Update(args) => commands::update::execute(args, &shell),
        Commands::Plugins(args) => commands::plugins::execute(args, &shell),
        Commands::People(args) => commands::people::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
