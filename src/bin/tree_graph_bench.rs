//! Builds a seeded synthetic project tree, then checks that the printer shows
//! exactly the entries an independent walkdir pass considers visible.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use termcolor::NoColor;
use tracing::{info, warn};
use walkdir::WalkDir;

use tree_graph::core::{print_tree, FsSource, TreeOptions};
use tree_graph::utils::is_skipped;

#[derive(Parser, Debug)]
#[command(
    name = "tree_graph_bench",
    about = "Time tree-graph on a generated tree and cross-check it against walkdir"
)]
struct BenchCli {
    /// Where the synthetic tree is created
    #[arg(long, default_value = "./bench-data/tree")]
    root: PathBuf,

    /// Reuse an existing tree at --root instead of generating one
    #[arg(long)]
    reuse: bool,

    /// Files scattered over the generated directories
    #[arg(long, default_value_t = 20_000)]
    files: usize,

    /// Deepest directory level below the root
    #[arg(long, default_value_t = 8)]
    depth: usize,

    /// Most subdirectories a generated directory gets
    #[arg(long, default_value_t = 4)]
    fanout: usize,

    /// Fraction of names that start with '.' or "build"
    #[arg(long, default_value_t = 0.2)]
    noise: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug)]
struct Shape {
    files: usize,
    depth: usize,
    fanout: usize,
    noise: f64,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
struct Generated {
    dirs: usize,
    files: usize,
    hidden_names: usize,
}

#[derive(Debug, Serialize)]
struct Timing {
    entries: usize,
    wall_time_ms: u128,
}

#[derive(Serialize)]
struct Report {
    timestamp: String,
    root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated: Option<Generated>,
    walkdir: Timing,
    printer: Timing,
    agree: bool,
}

/// Counts newlines so the printer can run without keeping its output.
#[derive(Default)]
struct LineCounter {
    lines: usize,
}

impl Write for LineCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lines += buf.iter().filter(|&&b| b == b'\n').count();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = BenchCli::parse();

    let generated = if cli.reuse {
        None
    } else {
        if cli.root.exists() {
            fs::remove_dir_all(&cli.root)
                .with_context(|| format!("clearing {}", cli.root.display()))?;
        }
        let shape = Shape {
            files: cli.files,
            depth: cli.depth,
            fanout: cli.fanout,
            noise: cli.noise,
        };
        let mut rng = StdRng::seed_from_u64(cli.seed);
        let stats = generate(&cli.root, shape, &mut rng)?;
        info!(?stats, root = %cli.root.display(), "generated tree");
        Some(stats)
    };

    let walkdir = count_visible(&cli.root);
    let printer = count_printed(&cli.root)?;
    let agree = walkdir.entries == printer.entries;
    let report = Report {
        timestamp: Utc::now().to_rfc3339(),
        root: cli.root.display().to_string(),
        generated,
        walkdir,
        printer,
        agree,
    };

    let json = serde_json::to_string_pretty(&report)?;
    match &cli.out {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?,
        None => println!("{json}"),
    }

    if !agree {
        bail!(
            "printer showed {} entries, walkdir found {}",
            report.printer.entries,
            report.walkdir.entries
        );
    }
    Ok(())
}

/// Grows directories breadth-first, then scatters files across them.
fn generate(root: &Path, shape: Shape, rng: &mut StdRng) -> Result<Generated> {
    if !(0.0..=1.0).contains(&shape.noise) {
        bail!("noise must be between 0 and 1");
    }
    fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;

    let mut stats = Generated::default();
    let mut dirs = vec![root.to_path_buf()];
    let mut queue = VecDeque::from([(root.to_path_buf(), 0usize)]);
    while let Some((dir, level)) = queue.pop_front() {
        if level >= shape.depth {
            continue;
        }
        for i in 0..rng.gen_range(0..=shape.fanout) {
            let name = pick_name(rng, shape.noise, "dir", i, &mut stats);
            let child = dir.join(name);
            fs::create_dir(&child).with_context(|| format!("creating {}", child.display()))?;
            stats.dirs += 1;
            dirs.push(child.clone());
            queue.push_back((child, level + 1));
        }
    }

    for i in 0..shape.files {
        let dir = &dirs[rng.gen_range(0..dirs.len())];
        let name = pick_name(rng, shape.noise, "file", i, &mut stats);
        let path = dir.join(name);
        File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        stats.files += 1;
    }
    Ok(stats)
}

fn pick_name(rng: &mut StdRng, noise: f64, stem: &str, i: usize, stats: &mut Generated) -> String {
    if !rng.gen_bool(noise) {
        return format!("{stem}{i}");
    }
    stats.hidden_names += 1;
    if rng.gen_bool(0.5) {
        format!(".{stem}{i}")
    } else {
        format!("build_{stem}{i}")
    }
}

/// Entries below `root` that survive the skip rule, following links like the
/// printer does.
fn count_visible(root: &Path) -> Timing {
    let start = Instant::now();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_skipped(e.file_name()));

    let mut entries = 0;
    for entry in walker {
        match entry {
            Ok(_) => entries += 1,
            Err(err) => warn!("walkdir: {err}"),
        }
    }
    Timing {
        entries,
        wall_time_ms: start.elapsed().as_millis(),
    }
}

fn count_printed(root: &Path) -> Result<Timing> {
    let start = Instant::now();
    let mut out = NoColor::new(LineCounter::default());
    print_tree(&FsSource, root, &TreeOptions::default(), &mut out)
        .with_context(|| format!("printing {}", root.display()))?;
    Ok(Timing {
        entries: out.into_inner().lines,
        wall_time_ms: start.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: Shape = Shape {
        files: 300,
        depth: 4,
        fanout: 3,
        noise: 0.3,
    };

    #[test]
    fn printer_matches_walkdir_on_generated_tree() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("tree");
        let stats = generate(&root, SMALL, &mut StdRng::seed_from_u64(7)).expect("generate");
        assert_eq!(stats.files, 300);
        assert!(stats.hidden_names > 0);

        let walked = count_visible(&root);
        let printed = count_printed(&root).expect("print");
        assert_eq!(printed.entries, walked.entries);
        assert!(walked.entries < stats.files + stats.dirs);
    }

    #[test]
    fn same_seed_generates_same_shape() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let a = generate(&tmp.path().join("a"), SMALL, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate(&tmp.path().join("b"), SMALL, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn noise_outside_unit_range_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let shape = Shape { noise: 1.5, ..SMALL };
        assert!(generate(tmp.path(), shape, &mut StdRng::seed_from_u64(0)).is_err());
    }
}
