use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use termcolor::{Color, ColorSpec, WriteColor};
use tracing::{debug, trace};

use crate::cli::Cli;
use crate::core::encoding::make_encoded_writer;
use crate::core::error::{TreeError, TreeResult};
use crate::core::source::{DirSource, FsSource};
use crate::utils::{is_skipped, Frame};

/// Nesting levels allowed below the root before the walk gives up.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";

/// Which siblings count when deciding whether an entry gets `└── `.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LastSibling {
    /// Last position in the raw listing, skipped names included. A visible
    /// entry followed only by skipped siblings keeps `├── `.
    #[default]
    Listing,
    /// Last entry that is actually printed.
    Visible,
}

#[derive(Clone, Debug)]
pub struct TreeOptions {
    pub last_sibling: LastSibling,
    pub max_depth: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            last_sibling: LastSibling::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TreeOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            last_sibling: cli.last_sibling.into(),
            max_depth: cli.max_depth,
        }
    }
}

/// Prints the tree for the CLI root to stdout.
pub fn run_tree(cli: &Cli) -> Result<()> {
    let mut out = make_encoded_writer(cli).context("opening standard output")?;
    write_tree(cli, out.as_mut())
}

/// The directory to print: the positional path, or the working directory.
pub fn root_path(cli: &Cli) -> PathBuf {
    cli.path.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Walks the real filesystem into `out` and flushes it, even when the walk
/// fails part way.
pub fn write_tree<W: WriteColor + ?Sized>(cli: &Cli, out: &mut W) -> Result<()> {
    let root = root_path(cli);
    let options = TreeOptions::from_cli(cli);

    let walked = print_tree(&FsSource, &root, &options, out);
    let flushed = out.flush();
    walked.with_context(|| format!("printing tree of {}", root.display()))?;
    flushed.context("flushing tree output")?;
    Ok(())
}

/// Writes one line per visible entry under `root`, parents before children.
///
/// Siblings appear in the order `source` lists them. Names starting with
/// `build` or `.` are neither printed nor descended into. The first listing
/// error aborts the walk; lines already written are left in `out`.
pub fn print_tree<S, W>(
    source: &S,
    root: &Path,
    options: &TreeOptions,
    out: &mut W,
) -> TreeResult<()>
where
    S: DirSource + ?Sized,
    W: WriteColor + ?Sized,
{
    let mut stack = vec![read_frame(source, root, String::new(), 0)?];

    while let Some(frame) = stack.last_mut() {
        if frame.idx >= frame.names.len() {
            stack.pop();
            continue;
        }

        let idx = frame.idx;
        frame.idx += 1;
        let name = &frame.names[idx];
        let path = frame.path.join(name);

        if is_skipped(name) {
            trace!(path = %path.display(), "skipping");
            continue;
        }

        let is_last = match options.last_sibling {
            LastSibling::Listing => idx + 1 == frame.names.len(),
            LastSibling::Visible => frame.last_visible == Some(idx),
        };
        let is_dir = source.is_dir(&path);
        write_line(out, &frame.prefix, is_last, &name.to_string_lossy(), is_dir)?;

        if !is_dir {
            continue;
        }

        let depth = frame.depth + 1;
        let prefix = format!("{}{}", frame.prefix, if is_last { GAP } else { PIPE });
        let child = read_frame(source, &path, prefix, depth)?;
        // Only a directory that would print something below the limit fails.
        if depth > options.max_depth && child.last_visible.is_some() {
            return Err(TreeError::DepthLimit {
                path,
                limit: options.max_depth,
            });
        }
        stack.push(child);
    }

    Ok(())
}

fn read_frame<S: DirSource + ?Sized>(
    dirs: &S,
    path: &Path,
    prefix: String,
    depth: usize,
) -> TreeResult<Frame> {
    let names = dirs.list(path).map_err(|source| TreeError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), entries = names.len(), depth, "listed directory");
    Ok(Frame::new(path.to_path_buf(), names, prefix, depth))
}

fn write_line<W: WriteColor + ?Sized>(
    out: &mut W,
    prefix: &str,
    is_last: bool,
    name: &str,
    is_dir: bool,
) -> io::Result<()> {
    let connector = if is_last { LAST_BRANCH } else { BRANCH };
    write!(out, "{prefix}{connector}")?;

    if is_dir {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
        write!(out, "{name}")?;
        out.reset()?;
    } else {
        write!(out, "{name}")?;
    }
    writeln!(out)
}
