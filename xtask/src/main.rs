use std::{env, path::PathBuf};

use clap::Parser;

// Import modules
mod api_generator;

// Type definition for results
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// ----------------------------------------------------------------------------
// Command-line Interface

#[derive(Debug, Parser)]
enum Cli {
    /// Generate the native API messages and dispatch table from `api.proto`
    GenerateApi(api_generator::GenerateApiArgs),
}

// ----------------------------------------------------------------------------
// Application

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_module("xtask", log::LevelFilter::Info)
        .init();

    // Determine the path to the workspace (i.e. the root of the repository).
    // Prefer the compile-time location of the `xtask` crate and fall back to
    // the current working directory when the binary runs elsewhere.
    let workspace_from_build = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();

    let workspace = if workspace_from_build.exists() {
        workspace_from_build.canonicalize()?
    } else {
        env::current_dir()?.canonicalize()?
    };

    match Cli::parse() {
        Cli::GenerateApi(args) => api_generator::generate_api(&workspace, args),
    }
}
