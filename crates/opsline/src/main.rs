// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opsline - support interaction triage and response routing.
//!
//! This is the binary entry point for the Opsline gateway.

use clap::{Parser, Subcommand};

mod serve;

/// Opsline - support interaction triage and response routing.
#[derive(Parser, Debug)]
#[command(name = "opsline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Opsline gateway server.
    Serve,
    /// Print the effective configuration (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match opsline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            opsline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(config);
        }
        None => {
            println!("opsline: use --help for available commands");
        }
    }
}

/// Prints the resolved configuration with credentials replaced by markers.
fn print_config(mut config: opsline_config::model::OpslineConfig) {
    config.auth.signing_secret = config.auth.signing_secret.map(|_| "[set]".into());
    config.auth.bootstrap_secret = config.auth.bootstrap_secret.map(|_| "[set]".into());
    config.completion.api_key = config.completion.api_key.map(|_| "[set]".into());

    match toml::to_string_pretty(&config) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => {
            eprintln!("error: failed to render config: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = opsline_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.service.name, "opsline");
        assert_eq!(config.server.port, 8700);
    }
}
