use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "mail_server", about = "Operator dashboard for sending system mail to game shards")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the dashboard with the given TOML config file
    Start { config: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Anything other than `start <configFile>` just prints usage.
    let config = match Cli::try_parse() {
        Ok(Cli {
            command: Some(Command::Start { config }),
        }) => config,
        _ => {
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    match mail_server::run_with_config(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("start failed: {err}");
            ExitCode::FAILURE
        }
    }
}
