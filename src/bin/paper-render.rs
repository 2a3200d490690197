//! CLI binary for paper-render.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RenderConfig` and prints the resulting PDF path.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use paper_render::{
    assemble_document, render, sanitize_body, ProgressCallback, RenderConfig, RenderOutcome,
    RenderProgressCallback, RenderStage, StageError,
};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
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

/// Terminal progress callback: a spinner whose prefix follows the current
/// stage, plus one log line per finished or failed stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style =
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

fn stage_label(stage: RenderStage) -> &'static str {
    match stage {
        RenderStage::Sanitize => "Sanitizing",
        RenderStage::Primary => "Compiling",
        RenderStage::Fallback => "Converting",
    }
}

impl RenderProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: RenderStage) {
        self.bar.set_prefix(stage_label(stage));
        self.bar.set_message(match stage {
            RenderStage::Sanitize => "writing LaTeX source…",
            RenderStage::Primary => "running primary compiler…",
            RenderStage::Fallback => "running fallback converter…",
        });
    }

    fn on_stage_complete(&self, stage: RenderStage, path: &Path) {
        self.bar.println(format!(
            "  {} {:<9} {}",
            green("✓"),
            stage.to_string(),
            dim(&path.display().to_string())
        ));
    }

    fn on_stage_error(&self, stage: RenderStage, error: &StageError) {
        let msg = error.to_string();
        let first_line = msg.lines().next().unwrap_or_default();
        // Truncate very long error messages to keep output tidy.
        let short = if first_line.chars().count() > 80 {
            format!("{}\u{2026}", first_line.chars().take(79).collect::<String>())
        } else {
            first_line.to_string()
        };
        self.bar.println(format!(
            "  {} {:<9} {}",
            red("✗"),
            stage.to_string(),
            red(&short)
        ));
    }

    fn on_render_complete(&self, outcome: &RenderOutcome) {
        self.bar.finish_and_clear();
        match outcome {
            RenderOutcome::Primary { .. } => eprintln!("{} PDF compiled", green("✔")),
            RenderOutcome::Fallback { .. } => {
                eprintln!("{} PDF produced by fallback converter", cyan("⚠"))
            }
            RenderOutcome::Failed(_) => eprintln!("{} no PDF produced", red("✘")),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a body file into ./output
  paper-render body.tex

  # Read the body from stdin
  echo 'Hello world. $E=mc^2$' | paper-render -

  # Custom output directory and title
  paper-render --output-dir build --title "Notes on Attention" body.tex

  # Primary compiler only, no pandoc fallback
  paper-render --no-fallback body.tex

  # Show the assembled document without running any tool
  paper-render --sanitize-only body.tex

  # JSON outcome (paths, timings, primary error if the fallback was used)
  paper-render --json body.tex

OUTPUT FILES (in --output-dir):
  paper_<YYYYMMDD_HHMMSS>.tex            assembled LaTeX source (always written)
  paper_<YYYYMMDD_HHMMSS>.pdf            primary compiler output
  paper_<YYYYMMDD_HHMMSS>.md             fallback intermediate
  paper_<YYYYMMDD_HHMMSS>_fallback.pdf   fallback converter output
  A _1, _2, … suffix is added when a name is already taken.

ENVIRONMENT VARIABLES:
  PAPER_RENDER_OUTPUT_DIR   Output directory
  PAPER_RENDER_COMPILER     Primary compiler (default: tectonic)
  PAPER_RENDER_CONVERTER    Fallback converter (default: pandoc)
  PAPER_RENDER_PDF_ENGINE   --pdf-engine passed to the converter
  RUST_LOG                  Overrides the log filter
"#;

/// Render a LaTeX paper body to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "paper-render",
    version,
    about = "Render a LaTeX paper body to PDF with a pandoc fallback",
    long_about = "Wrap a LaTeX document body in a fixed preamble and compile it to PDF. \
When the primary compiler is missing or fails, a Markdown rendering of the body is converted \
with pandoc instead.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// File holding the document body, or `-` for stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Directory that receives every artifact.
    #[arg(short, long, env = "PAPER_RENDER_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Primary LaTeX compiler.
    #[arg(long, env = "PAPER_RENDER_COMPILER", default_value = "tectonic")]
    compiler: String,

    /// Fallback converter (pandoc-compatible).
    #[arg(long, env = "PAPER_RENDER_CONVERTER", default_value = "pandoc")]
    converter: String,

    /// PDF engine forwarded to the converter.
    #[arg(long, env = "PAPER_RENDER_PDF_ENGINE")]
    pdf_engine: Option<String>,

    /// Document title.
    #[arg(long, env = "PAPER_RENDER_TITLE", default_value = "AI Research Paper")]
    title: String,

    /// Document author.
    #[arg(long, env = "PAPER_RENDER_AUTHOR", default_value = "")]
    author: String,

    /// Primary compiler timeout in seconds.
    #[arg(long, env = "PAPER_RENDER_TIMEOUT", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Fallback converter timeout in seconds.
    #[arg(long, env = "PAPER_RENDER_FALLBACK_TIMEOUT", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    fallback_timeout: u64,

    /// Fail instead of running the fallback converter.
    #[arg(long, env = "PAPER_RENDER_NO_FALLBACK")]
    no_fallback: bool,

    /// Print the assembled LaTeX document and exit; no tool is run.
    #[arg(long)]
    sanitize_only: bool,

    /// Output the render outcome as JSON.
    #[arg(long, env = "PAPER_RENDER_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PAPER_RENDER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPER_RENDER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPER_RENDER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries stage feedback, so INFO logs are hidden while it
    // is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.sanitize_only;
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

    let body = read_body(&cli.input).await?;

    // ── Sanitize-only mode ───────────────────────────────────────────────
    if cli.sanitize_only {
        let config = build_config(&cli, None)?;
        let document = assemble_document(&sanitize_body(&body), &config.meta);
        io::stdout()
            .lock()
            .write_all(document.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn RenderProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run render ───────────────────────────────────────────────────────
    let outcome = render(&body, &config).await;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise outcome")?;
        println!("{json}");
        if !outcome.is_success() {
            anyhow::bail!("Render failed");
        }
        return Ok(());
    }

    if let Some(stats) = outcome.stats().filter(|_| !cli.quiet) {
        eprintln!(
            "   {}",
            dim(&format!(
                "primary {}ms  /  fallback {}  —  {}ms total",
                stats.primary_ms,
                stats
                    .fallback_ms
                    .map_or_else(|| "skipped".to_string(), |ms| format!("{ms}ms")),
                stats.total_ms
            ))
        );
    }

    let pdf = outcome.into_result().context("Render failed")?;
    println!("{}", bold(&pdf.display().to_string()));
    Ok(())
}

/// Read the document body from a file or stdin.
async fn read_body(input: &str) -> Result<String> {
    if input == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read body from stdin")?;
        Ok(body)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read body from {:?}", input))
    }
}

/// Map CLI args to `RenderConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RenderConfig> {
    let mut builder = RenderConfig::builder()
        .output_dir(&cli.output_dir)
        .compiler(&cli.compiler)
        .converter(&cli.converter)
        .title(&cli.title)
        .author(&cli.author)
        .compile_timeout_secs(cli.timeout)
        .fallback_timeout_secs(cli.fallback_timeout)
        .fallback_enabled(!cli.no_fallback);

    if let Some(ref engine) = cli.pdf_engine {
        builder = builder.pdf_engine(engine);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
