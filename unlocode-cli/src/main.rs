//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use unlocode_cli::{CliError, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => {}
        // Clap renders help, version and usage errors itself.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("unlocode: {err}");
            std::process::exit(1);
        }
    }
}
