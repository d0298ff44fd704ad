//! Intermediate code generation.

mod expression;
mod generator;
#[cfg(test)]
mod interpreter;
mod label_generator;
mod name_generator;
mod ops;
mod optimiser;
mod stats;
mod tac;

pub use generator::generate;
pub use optimiser::optimise;
pub use tac::*;
