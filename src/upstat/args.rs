use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "upstat", version)]
#[command(about = "Validate text uploads and record their line and word counts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding config.json and local.json
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Also append log lines to this file (overrides log_file in config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload one or more files
    #[command(alias = "up")]
    Upload {
        /// Paths of the files to upload
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// List stored records
    #[command(alias = "ls")]
    List,

    /// Show the effective configuration
    Config {
        /// Write a default config.json if none exists
        #[arg(long)]
        init: bool,
    },

    /// Run the built-in demo uploads against a throwaway store
    Demo,
}
