use std::ffi::OsStr;
use termcolor::ColorChoice;

use crate::cli::args::ColorMode;

/// Name prefixes that are never printed or descended into.
pub const SKIPPED_PREFIXES: [&str; 2] = ["build", "."];

pub fn is_skipped(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

pub fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Auto => ColorChoice::Auto,
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
    }
}
