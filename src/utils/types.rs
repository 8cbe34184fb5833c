use std::ffi::OsString;
use std::path::PathBuf;

/// One directory awaiting traversal on the explicit walk stack.
#[derive(Debug)]
pub struct Frame {
    pub path: PathBuf,
    pub names: Vec<OsString>,
    pub idx: usize,
    pub prefix: String,
    pub depth: usize,
    /// Index of the last entry that survives the skip rule.
    pub last_visible: Option<usize>,
}

impl Frame {
    pub fn new(path: PathBuf, names: Vec<OsString>, prefix: String, depth: usize) -> Self {
        let last_visible = names
            .iter()
            .rposition(|name| !crate::utils::is_skipped(name));
        Self {
            path,
            names,
            idx: 0,
            prefix,
            depth,
            last_visible,
        }
    }
}
