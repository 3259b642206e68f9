//! CLI binary for docshift.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docshift::{
    batch_convert_with_progress, convert_document, document_info, BatchProgressCallback,
    ConversionConfig, FilePattern, Format,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
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

/// Terminal progress for batch runs: a live bar plus a log line per file.
struct CliBatchProgress {
    bar: ProgressBar,
}

impl CliBatchProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Converting");
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliBatchProgress {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_file_start(&self, _index: usize, _total: usize, name: &Path) {
        if let Some(n) = name.file_name() {
            self.bar.set_message(n.to_string_lossy().into_owned());
        }
    }

    fn on_file_converted(&self, _index: usize, _total: usize, name: &Path) {
        self.bar.println(format!(
            "  {} {}",
            green("✓"),
            name.file_name().unwrap_or_default().to_string_lossy()
        ));
        self.bar.inc(1);
    }

    fn on_file_failed(&self, _index: usize, _total: usize, name: &Path, reason: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = reason.lines().next().unwrap_or(reason);
        let msg = if msg.len() > 80 {
            format!("{}\u{2026}", &msg[..79])
        } else {
            msg.to_string()
        };
        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            name.file_name().unwrap_or_default().to_string_lossy(),
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, converted: usize) {
        self.bar.finish_and_clear();
        let failed = total.saturating_sub(converted);
        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a single file (default output directory)
  docshift convert report.pdf --to md

  # Convert to an explicit output path
  docshift convert notes.md --to html -o site/notes.html

  # Convert every Markdown file in a directory to HTML
  docshift batch ./docs --to html --pattern '*.md'

  # Inspect a document without converting
  docshift info paper.pdf
  docshift info paper.pdf --json

  # Show the configured format matrix
  docshift formats

  # Use a JSON config file and a larger size limit
  docshift --config docshift.json --max-file-size 52428800 convert big.pdf --to txt

SUPPORTED FORMATS:
  Input:   pdf, docx, html, md, txt
  Output:  pdf, html, md, txt          (docx output is not implemented)

CONFIG FILE (JSON, all fields optional):
  {
    "max_file_size": 10485760,
    "input_formats": ["pdf", "docx", "html", "md", "txt"],
    "output_formats": ["html", "md", "txt", "pdf"],
    "output_directory": "./converted_documents",
    "batch_concurrency": 4
  }
"#;

/// Convert documents between pdf, docx, html, md, and txt.
#[derive(Parser, Debug)]
#[command(
    name = "docshift",
    version,
    about = "Convert documents between pdf, docx, html, md, and txt",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(long, global = true, env = "DOCSHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum input file size in bytes.
    #[arg(long, global = true, env = "DOCSHIFT_MAX_FILE_SIZE")]
    max_file_size: Option<u64>,

    /// Override the default output directory.
    #[arg(long, global = true, env = "DOCSHIFT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v: info, -vv: debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single document to another format.
    Convert {
        /// Input document path.
        input: PathBuf,

        /// Target format: pdf, docx, html, md, txt.
        #[arg(short = 't', long = "to")]
        to: Format,

        /// Write the result here instead of the output directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect a document without converting it.
    Info {
        /// Document path.
        path: PathBuf,

        /// Print structured JSON instead of a field list.
        #[arg(long)]
        json: bool,
    },

    /// Convert every matching file in a directory.
    Batch {
        /// Directory holding the input documents.
        directory: PathBuf,

        /// Target format: pdf, docx, html, md, txt.
        #[arg(short = 't', long = "to")]
        to: Format,

        /// Filename filter with `*` wildcards, e.g. '*.md'.
        #[arg(short, long)]
        pattern: Option<String>,

        /// Concurrent conversions (overrides config).
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Disable the progress bar.
        #[arg(long)]
        no_progress: bool,
    },

    /// Show the configured input and output format sets.
    Formats {
        /// Print structured JSON instead of a field list.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Command::Convert { input, to, output } => {
            let dest = convert_document(&input, to, output.as_deref(), &config)
                .await
                .context("Conversion failed")?;
            eprintln!(
                "{} {}  →  {}",
                green("✔"),
                input.display(),
                bold(&dest.display().to_string())
            );
        }

        Command::Info { path, json } => {
            let info = document_info(&path, &config)
                .await
                .context("Failed to inspect document")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info).context("Failed to serialize info")?
                );
            } else {
                println!("File:            {}", path.display());
                println!("Format:          {}", info.format);
                println!("Size:            {} KB", info.size_kb);
                println!("Content length:  {} bytes", info.content_length);
                print_metadata(&info.metadata);
                if let Some(m) = info.last_modified {
                    println!("Last modified:   {}", m.to_rfc3339());
                }
            }
        }

        Command::Batch {
            directory,
            to,
            pattern,
            jobs,
            no_progress,
        } => {
            let mut config = config;
            if let Some(jobs) = jobs {
                config.batch_concurrency = jobs.max(1);
            }
            let pattern = pattern
                .as_deref()
                .map(FilePattern::compile)
                .transpose()
                .context("Invalid pattern")?;

            let progress: Option<Arc<dyn BatchProgressCallback>> = if no_progress {
                None
            } else {
                Some(CliBatchProgress::new())
            };

            let result =
                batch_convert_with_progress(&directory, to, pattern.as_ref(), &config, progress)
                    .await
                    .context("Batch conversion failed")?;

            print!("{}", result.report(to));
            if result.total() > 0 && result.converted() == 0 {
                std::process::exit(1);
            }
        }

        Command::Formats { json } => {
            let formats = config.supported_formats();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&formats)
                        .context("Failed to serialize formats")?
                );
            } else {
                println!("Input formats:   {}", join_formats(&formats.input));
                println!("Output formats:  {}", join_formats(&formats.output));
                println!("Max file size:   {} bytes", formats.max_file_size);
                println!("Output dir:      {}", formats.output_directory.display());
                println!(
                    "{}",
                    dim("Note: docx output is declared but not implemented.")
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args (and an optional config file) to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut config = match &cli.config {
        Some(path) => ConversionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ConversionConfig::default(),
    };
    if let Some(size) = cli.max_file_size {
        config.max_file_size = size;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_directory = dir.clone();
    }
    Ok(config)
}

fn print_metadata(metadata: &docshift::DocMetadata) {
    use docshift::DocMetadata;
    match metadata {
        DocMetadata::None => {}
        DocMetadata::Pdf(m) => {
            println!("Pages:           {}", m.page_count);
            if let Some(t) = &m.info.title {
                println!("Title:           {t}");
            }
            if let Some(a) = &m.info.author {
                println!("Author:          {a}");
            }
            if let Some(p) = &m.info.producer {
                println!("Producer:        {p}");
            }
        }
        DocMetadata::Docx(m) => {
            for w in &m.warnings {
                println!("Warning:         {w}");
            }
        }
        DocMetadata::Html(m) => {
            if let Some(t) = &m.title {
                println!("Title:           {t}");
            }
        }
    }
}

fn join_formats(formats: &[Format]) -> String {
    formats
        .iter()
        .map(Format::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
