use std::process;

use clap::CommandFactory;
use stickynotes::Config;
use stickynotes_cli::cli::{Cli, Commands};
use stickynotes_cli::error::{handle_cli_result, CliError};
use stickynotes_cli::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use stickynotes_cli::{completions, logging, notes, shell};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {}", e);
            process::exit(EXIT_ERROR);
        }
        process::exit(EXIT_SUCCESS);
    };

    let shell_mode = matches!(command, Commands::Shell);
    logging::init_tracing(
        logging::log_level(cli.quiet, cli.debug, cli.verbose),
        shell_mode,
    );

    let exit_code = match command {
        Commands::Completion { shell } => {
            tracing::info!("Generating completion for {:?}", shell);
            run_completions(shell)
        }
        Commands::Config => {
            print!("{}", Config::example_yaml_config());
            EXIT_SUCCESS
        }
        command => match load_config(cli.config.as_deref()) {
            Ok(config) => {
                if shell_mode {
                    tracing::info!("Starting shell");
                    handle_cli_result(shell::run_shell(&config).await)
                } else {
                    tracing::debug!("Running {:?}", command);
                    handle_cli_result(notes::run_note_command(command, &config).await)
                }
            }
            Err(e) => handle_cli_result::<()>(Err(e)),
        },
    };

    process::exit(exit_code);
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, CliError> {
    let config = match path {
        Some(path) => Config::with_yaml_file(path)?,
        None => Config::new(),
    };
    config.validate().map_err(CliError::from)?;
    Ok(config)
}

fn run_completions(shell: clap_complete::Shell) -> i32 {
    match completions::print_completion(shell) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("Completion error: {}", e);
            EXIT_ERROR
        }
    }
}
