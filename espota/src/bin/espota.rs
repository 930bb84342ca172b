use std::process::exit;

use clap::{Parser, Subcommand};
use espota::{
    cli::{self, config::Config, ChecksumArgs, UploadArgs},
    logging::initialize_logger,
};
use log::{debug, LevelFilter};
use miette::Result;

#[derive(Debug, Parser)]
#[command(about, max_term_width = 100, propagate_version = true, version)]
struct Cli {
    /// Log every protocol step
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    subcommand: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload a firmware image to a device over the air
    Upload(UploadArgs),
    /// Print the MD5 checksum and compressed size of a firmware image
    ///
    /// These are the values announced to a device before the transfer
    /// starts, which helps diagnosing checksum mismatches.
    Checksum(ChecksumArgs),
}

fn main() -> Result<()> {
    miette::set_panic_hook();

    // Attempt to parse any provided command-line arguments, or print the help
    // message and terminate if the invocation is not correct.
    let cli = Cli::parse();
    initialize_logger(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    debug!("{:#?}", cli.subcommand);

    // Load any user configuration, if present.
    let config = Config::load()?;

    match cli.subcommand {
        Commands::Upload(args) => {
            let code = cli::upload(args, &config)?;
            if code != 0 {
                exit(code);
            }
            Ok(())
        }
        Commands::Checksum(args) => cli::checksum(args),
    }
}
