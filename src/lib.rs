//! Prints a directory as a box-drawing tree, leaving out dotfiles and
//! anything whose name starts with `build`.

pub mod cli;
pub mod core;
pub mod utils;
