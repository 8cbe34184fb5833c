use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tree_graph::cli::Cli;

#[cfg(windows)]
fn set_console_encoding(encoding: tree_graph::cli::EncodingMode) {
    use tree_graph::cli::EncodingMode;
    use windows_sys::Win32::System::Console::SetConsoleOutputCP;
    unsafe {
        match encoding {
            EncodingMode::Utf8 | EncodingMode::Utf8bom | EncodingMode::Utf16le => {
                SetConsoleOutputCP(65001); // UTF-8
            }
            EncodingMode::Sjis => {
                SetConsoleOutputCP(932); // CP932 (Shift-JIS)
            }
            EncodingMode::Auto => {
                // Do nothing, use system default
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    // stdout carries only the tree
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    #[cfg(windows)]
    set_console_encoding(cli.encoding);

    tree_graph::core::run_tree(&cli)
}
