//! The syntax tree produced by the parser and checked by semantic analysis.
//!
//! Generation relies purely on the shape of this tree; it carries no type or
//! scope information.
#[cfg(test)]
pub mod build;
mod error;
mod node;

use std::{fs, path::Path};

pub use error::TreeError;
pub use node::*;

/// Load a syntax tree from a JSON file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Node, TreeError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| TreeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    from_json(&content)
}

/// Parse a syntax tree from its JSON form. The root must be a `Program` node.
pub fn from_json(json: &str) -> Result<Node, TreeError> {
    let root: Node = serde_json::from_str(json)?;
    if !root.is(NodeKind::Program) {
        return Err(TreeError::NotAProgram(root.kind));
    }
    Ok(root)
}
