//! CLI binary for chm2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use chm2md::{
    convert_tree, decompile_chm, BatchProgress, BatchProgressCallback, ConversionConfig,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-file log
/// lines using [indicatif]. The batch is sequential, so a single slot for
/// the current file's start time is enough.
struct CliProgressCallback {
    bar: ProgressBar,
    current_start: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Converting");

        Arc::new(Self {
            bar,
            current_start: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.current_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} file(s)…"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, relative: &Path) {
        *self.current_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(relative.display().to_string());
    }

    fn on_file_complete(&self, _index: usize, _total: usize, relative: &Path, markdown_len: usize) {
        self.bar.println(format!(
            "  {} {}  {}  {}",
            green("✓"),
            relative.display(),
            dim(&format!("{markdown_len:>6} bytes")),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, _total: usize, relative: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            let cut = error
                .char_indices()
                .take_while(|(i, _)| *i < 79)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}\u{2026}", &error[..cut])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            relative.display(),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} file(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} file(s) converted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Unpack a CHM archive into ./html (Windows, requires hh.exe)
  chm2md decompile manual.chm -o html

  # Convert the whole HTML tree into a parallel Markdown tree
  chm2md convert --root html --out-root md

  # Convert in place (Markdown lands next to the HTML files)
  chm2md convert --root html

  # Only one subdirectory of the manual
  chm2md convert --root html --subdir structs

  # Machine-readable batch report
  chm2md convert --root html --out-root md --json > report.json

TYPICAL WORKFLOW (vendor SDK manual):
  1. chm2md decompile 设备网络SDK使用手册.chm -o html     (on Windows)
  2. chm2md convert --root html --out-root md              (anywhere)

ENVIRONMENT VARIABLES:
  CHM2MD_ROOT         HTML root directory (default: html)
  CHM2MD_OUT_ROOT     Markdown output root (default: same as the HTML root)
  CHM2MD_NO_PROGRESS  Disable the progress bar
  RUST_LOG            Override the log filter (tracing_subscriber syntax)
"#;

/// Convert compiled HTML Help (CHM) archives to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "chm2md",
    version,
    about = "Convert compiled HTML Help (CHM) archives to Markdown",
    long_about = "Convert a CHM archive (decompiled to HTML via the Windows help viewer) into a \
parallel tree of Markdown files. Handles mixed UTF-8/GBK/GB2312/GB18030 encodings, strips \
scripts and styling, and normalises the rendered Markdown.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CHM2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CHM2MD_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a decompiled HTML tree into a Markdown tree.
    Convert(ConvertArgs),
    /// Unpack a CHM archive into HTML pages (requires hh.exe, Windows).
    Decompile(DecompileArgs),
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// HTML root directory (the decompile output).
    #[arg(long, env = "CHM2MD_ROOT", default_value = "html")]
    root: PathBuf,

    /// Markdown output root. Defaults to the HTML root (conversion in place).
    #[arg(short = 'o', long, env = "CHM2MD_OUT_ROOT")]
    out_root: Option<PathBuf>,

    /// Only convert this subdirectory (relative to the root).
    #[arg(long)]
    subdir: Option<PathBuf>,

    /// Source extension to match, case-insensitive.
    #[arg(long, default_value = "html")]
    source_ext: String,

    /// Extension for the output files.
    #[arg(long, default_value = "md")]
    md_ext: String,

    /// Print the structured batch report (BatchOutput) as JSON to stdout.
    #[arg(long, env = "CHM2MD_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CHM2MD_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(clap::Args, Debug)]
struct DecompileArgs {
    /// The CHM archive to unpack.
    chm: PathBuf,

    /// Output directory for the extracted HTML pages.
    #[arg(short, long, default_value = "html")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = matches!(
        &cli.command,
        Commands::Convert(args) if !args.no_progress && !args.json
    ) && !cli.quiet;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => run_convert(&args, show_progress, cli.quiet),
        Commands::Decompile(args) => run_decompile(&args),
    }
}

fn run_convert(args: &ConvertArgs, show_progress: bool, quiet: bool) -> Result<()> {
    let md_root = args.out_root.clone().unwrap_or_else(|| args.root.clone());

    let mut builder = ConversionConfig::builder()
        .source_extension(args.source_ext.as_str())
        .markdown_extension(args.md_ext.as_str());
    if let Some(ref subdir) = args.subdir {
        builder = builder.subdir(subdir.clone());
    }
    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as BatchProgress);
    }
    let config = builder.build().context("Invalid configuration")?;

    let output = convert_tree(&args.root, &md_root, &config).context("Conversion failed")?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialise batch report")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    }

    if !quiet {
        // End-of-run failure report, after the per-file log lines.
        for failure in output.failures() {
            if let Some(ref e) = failure.error {
                eprintln!("{} {}", red("failed:"), e);
            }
        }
        if !show_progress && !args.json {
            eprintln!(
                "Converted {}/{} file(s) in {}ms",
                output.stats.converted, output.stats.discovered, output.stats.duration_ms
            );
        }
    }

    // A completed batch is a success even when files failed — every
    // discovered file was attempted and each failure was reported above.
    Ok(())
}

fn run_decompile(args: &DecompileArgs) -> Result<()> {
    decompile_chm(&args.chm, &args.output).context("Decompilation failed")?;
    eprintln!(
        "{} Unpacked {} into {}",
        green("✔"),
        bold(&args.chm.display().to_string()),
        bold(&args.output.display().to_string()),
    );
    Ok(())
}
