//! Terminal dashboard for the `taskline` task manager.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod config;
mod logging;
mod palette;
mod taskline;
mod tui;

use crate::config::Config;
use crate::palette::Styles;
use crate::taskline::TasklineCommand;

#[derive(Parser, Debug)]
#[command(
    name = "taskline-tui",
    version,
    about = "Browse taskline and add tasks and notes without leaving the terminal"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config)?;
    let _log_guard = logging::init(config.log_file.as_deref())?;

    let styles = Styles::for_theme(config.theme());
    let taskline = TasklineCommand::from_config(&config);
    tracing::info!(program = %config.program(), theme = styles.name, "Starting dashboard");

    tui::run_tui(&taskline, &styles)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Exiting: {err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
