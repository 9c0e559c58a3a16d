use adbhost::cli::Cli;
use adbhost::commands::runner::CommandRunner;
use adbhost::config::Config;
use adbhost::output::OutputFormatter;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let runner = CommandRunner::new(Config::load());
    if let Err(e) = runner.run(cli).await {
        let message = format!("Error: {}", e);
        if OutputFormatter::new().error(&message).is_err() {
            eprintln!("{}", message);
        }
        process::exit(1);
    }
}
