use std::{io, path::PathBuf};

use thiserror::Error;

use super::NodeKind;

/// An error raised while loading a syntax tree produced by the front-end.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("cannot read syntax tree from '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed syntax tree: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("the root of the syntax tree must be a Program node, found {0:?}")]
    NotAProgram(NodeKind),
}
