use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use commandline::{Operation, Options};
use il::TacListing;

use crate::prelude::*;

mod commandline;
mod il;
mod listing;
mod tree;

mod prelude {
    pub use log::{debug, info, trace};
}

const UNOPTIMISED_LISTING: &str = "output.ir";
const OPTIMISED_LISTING: &str = "output_optimized.ir";

fn main() -> Result<()> {
    let options = Options::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(options.verbose)
        .init()?;

    compile(&options.operation)
}

fn compile(operation: &Operation) -> Result<()> {
    let file = operation.file();
    let output = operation.output();

    let program = tree::load(file)
        .with_context(|| format!("Could not load a syntax tree from {}", file.display()))?;

    let mut listing = il::generate(&program);
    info!("Generated {} instructions", listing.len());

    fs::create_dir_all(&output.out_dir).with_context(|| {
        format!(
            "Could not create output directory {}",
            output.out_dir.display()
        )
    })?;

    write_listing(&output.out_dir.join(UNOPTIMISED_LISTING), &listing)?;
    if !output.quiet {
        print!("{}", listing);
    }

    if operation.optimise() {
        let stats = il::optimise(&mut listing);
        write_listing(&output.out_dir.join(OPTIMISED_LISTING), &listing)?;

        if !output.quiet {
            println!();
            print!("{}", listing);
            println!();
            println!("{}", stats);
        }
    }

    Ok(())
}

fn write_listing(path: &Path, listing: &TacListing) -> Result<()> {
    fs::write(path, listing.to_string())
        .with_context(|| format!("Could not write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
