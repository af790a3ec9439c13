use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use localesync::Config;
use localesync::config::ACCESS_TOKEN_ENV;

mod commands;
mod output;

use output::Output;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Uploads every local file matching the configured push sources.
    /// Locales that do not exist remotely yet are created first.
    Push {
        /// Branch of the remote project to push to
        #[clap(long)]
        branch: Option<String>,
    },
    /// Downloads every remote locale into the paths generated from the
    /// configured pull targets
    Pull {
        #[clap(long)]
        branch: Option<String>,
    },
}

#[derive(Parser)]
#[clap(version, author, about)]
pub struct Cli {
    /// Output results as JSON
    #[clap(long, global = true)]
    pub json: bool,

    /// Only print errors
    #[clap(long, short, global = true)]
    pub quiet: bool,

    /// Log what the patterns match and what is sent to the remote
    #[clap(long, global = true)]
    pub debug: bool,

    /// Path to the config file, instead of looking for .localesync.yml
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Access token, overriding the one in the config file
    #[clap(long, global = true, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

fn init_logger(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let current_dir = std::env::current_dir()?;
            let (path, config) = Config::find(&current_dir)
                .ok_or_else(|| anyhow!("No .localesync.yml found in {} or any parent directory", current_dir.display()))??;
            log::debug!("Using config {}", path.display());
            config
        }
    };
    config.override_access_token(cli.access_token.clone());
    Ok(config)
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.debug);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let output = Output::new(format, cli.quiet);
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Push { branch } => commands::push::run(&output, &config, branch.as_deref())?,
        Command::Pull { branch } => commands::pull::run(&output, &config, branch.as_deref())?,
    }
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("error: {e:#}");
        ::std::process::exit(1)
    }
}
