//! `roscompile completions` command

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let mut out = io::stdout().lock();

    clap_complete::generate(args.shell, &mut cmd, env!("CARGO_BIN_NAME"), &mut out);
    out.flush().context("failed to write completions")?;

    Ok(())
}
