use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use aka_cli::app;
use aka_cli::cli_args::Args;
use aka_core::events::{LogNotifier, Notifier};
use aka_core::host::Output;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let output = Output::inherit();
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let path_var = env::var_os("PATH");

    match app::execute(&args, &output, path_var.as_deref(), notifier) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_clean_exit() => ExitCode::SUCCESS,
        Err(e) => {
            if app::should_report(&e) {
                eprintln!("{e}");
            }
            ExitCode::from(app::exit_status(&e))
        }
    }
}
