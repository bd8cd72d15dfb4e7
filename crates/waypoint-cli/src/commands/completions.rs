//! Shell completion scripts

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    tracing::debug!("Generating {} completions for {}", args.shell, bin_name);
    generate(args.shell, &mut cmd, bin_name, &mut std::io::stdout());
    Ok(())
}
