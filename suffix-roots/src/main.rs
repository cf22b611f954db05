use colored::Colorize;
use std::process::ExitCode;
use suffix_roots::{command_argument_builder, generate_args_from_matches, handle_generate};
use tracing_subscriber::EnvFilter;

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = command_argument_builder().get_matches();
    init_tracing(matches.get_flag("quiet"));

    let args = generate_args_from_matches(&matches);
    match handle_generate(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
