//! CLI module for the Anima web front-end

pub mod serve;

use clap::{Parser, Subcommand};

/// Anima - redox and lithiation potential predictions for SMILES molecules
#[derive(Parser, Debug)]
#[command(name = "anima-web")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the page and JSON API server
    Serve(serve::ServeArgs),
}
