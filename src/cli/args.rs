use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::core::tree::{LastSibling, DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(name = "tree-graph")]
#[command(
    version,
    about = "Print a directory tree, skipping build outputs and dotfiles"
)]
pub struct Cli {
    /// Root path (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// How the last-sibling connector is chosen
    #[arg(long, value_enum, default_value_t = LastSiblingMode::Listing)]
    pub last_sibling: LastSiblingMode,

    /// Abort when the tree nests deeper than this (guards symlink cycles)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_depth: usize,

    /// Color directory names
    #[arg(long, value_enum, default_value_t = ColorMode::Never)]
    pub color: ColorMode,

    #[arg(
        long,
        value_enum,
        default_value = "utf8",
        help = "Output encoding: utf8 | utf8bom | utf16le | sjis | auto"
    )]
    pub encoding: EncodingMode,

    /// Log directory reads to stderr
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingMode {
    Utf8,
    Utf8bom,
    Utf16le,
    Sjis,
    Auto,
}

/// `listing` counts skipped siblings when deciding which entry is last;
/// `visible` only counts the entries that are printed.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LastSiblingMode {
    Listing,
    Visible,
}

impl From<LastSiblingMode> for LastSibling {
    fn from(mode: LastSiblingMode) -> Self {
        match mode {
            LastSiblingMode::Listing => LastSibling::Listing,
            LastSiblingMode::Visible => LastSibling::Visible,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}
