pub mod encoding;
pub mod error;
pub mod source;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use source::{DirSource, FsSource};
pub use tree::{print_tree, root_path, run_tree, write_tree, LastSibling, TreeOptions};
