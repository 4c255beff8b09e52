use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use donorcast::ui::cli::actions::App;
use donorcast::ui::cli::args::Cli;
use donorcast::ui::cli::render::{BOLD, DIM, FG_CYAN, RESET};
use donorcast::ui::cli::{drivers::InquireDriver, wizard::run_menu};
use donorcast::utils::init_logging;

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = cli.global.load_config()?;
    let today = Local::now().date_naive();
    let mut app = App::new(config, cli.global.dataset, cli.global.roster, today);

    match cli.command {
        Some(command) => {
            let action = command.into_action();
            let output = app
                .execute(&action)
                .with_context(|| format!("failed to run {action:?}"))?;
            println!("{output}");
        }
        None => {
            println!(
                "{BOLD}{FG_CYAN}▶ donorcast{RESET}  {DIM}demo only, no real messages are sent{RESET}"
            );
            let driver = InquireDriver;
            run_menu(&driver, &mut app, &mut io::stdout()).context("interactive menu failed")?;
        }
    }

    Ok(())
}
