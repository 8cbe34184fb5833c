pub mod args;

pub use args::{Cli, ColorMode, EncodingMode, LastSiblingMode};
