use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(about = "Three-address code generator and optimiser for C--")]
pub struct Options {
    #[command(subcommand)]
    pub operation: Operation,
    #[arg(short, long, default_value_t = 1)]
    pub verbose: usize,
}

#[derive(Debug, Subcommand)]
pub enum Operation {
    /// Generate intermediate code for a checked syntax tree
    Generate {
        /// The syntax tree, as JSON
        file: PathBuf,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Generate intermediate code and optimise it
    Optimise {
        /// The syntax tree, as JSON
        file: PathBuf,
        #[command(flatten)]
        output: OutputOptions,
    },
}

impl Operation {
    pub fn file(&self) -> &PathBuf {
        match self {
            Self::Generate { file, .. } | Self::Optimise { file, .. } => file,
        }
    }

    pub fn output(&self) -> &OutputOptions {
        match self {
            Self::Generate { output, .. } | Self::Optimise { output, .. } => output,
        }
    }

    pub fn optimise(&self) -> bool {
        matches!(self, Self::Optimise { .. })
    }
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    #[arg(short, long, default_value = ".")]
    /// Directory the listings are written to
    pub out_dir: PathBuf,
    #[arg(short, long)]
    /// Do not print the listings to standard output
    pub quiet: bool,
}
