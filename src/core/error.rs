use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("cannot list directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "{} nests deeper than {limit} levels (symbolic link cycle?)",
        path.display()
    )]
    DepthLimit { path: PathBuf, limit: usize },

    #[error("failed to write tree output")]
    Write(#[from] io::Error),
}
