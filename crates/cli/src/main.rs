use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use sweep_code_chunker::{ChunkerConfig, LanguageTag, StructuralChunker};

mod collect;

use collect::{collect_files, DEFAULT_EXTENSIONS};

#[derive(Parser)]
#[command(name = "codesweep")]
#[command(about = "Structural chunk inspection for source analysis jobs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Chunker configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print each file's chunk layout
    Chunks {
        /// Files or directories to chunk
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Size a prospective analysis job: chunk counts per file and in total
    Plan {
        /// Files or directories to size
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Comma-separated extension filter for directory walks
        #[arg(long, value_delimiter = ',')]
        ext: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    let chunker = StructuralChunker::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Commands::Chunks { paths, json } => run_chunks(&chunker, &paths, json),
        Commands::Plan { paths, ext } => run_plan(&chunker, &paths, &ext),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ChunkerConfig> {
    let Some(path) = path else {
        return Ok(ChunkerConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ChunkerConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;

    Ok(config)
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

fn run_chunks(chunker: &StructuralChunker, paths: &[PathBuf], json: bool) -> Result<()> {
    let files = collect_files(paths, &default_extensions())?;
    if files.is_empty() {
        anyhow::bail!("no files matched");
    }

    let mut documents = Vec::new();

    for file in &files {
        let Some(text) = read_file(file) else {
            continue;
        };

        let language = LanguageTag::from_path(file);
        let chunks = chunker.chunk(&text, language);

        if json {
            documents.push(serde_json::json!({
                "path": file.display().to_string(),
                "language": language.as_str(),
                "chunks": chunks,
            }));
            continue;
        }

        let stats = StructuralChunker::stats(&chunks);
        println!(
            "{} ({}): {}",
            style(file.display()).bold(),
            language,
            stats
        );
        for chunk in &chunks {
            println!(
                "  [{:>5}-{:>5}] {:<12} {}",
                chunk.start_line,
                chunk.end_line,
                chunk.kind.as_str(),
                chunk.label
            );
        }
        println!();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }

    Ok(())
}

fn run_plan(chunker: &StructuralChunker, paths: &[PathBuf], ext: &[String]) -> Result<()> {
    let extensions = if ext.is_empty() {
        default_extensions()
    } else {
        ext.to_vec()
    };

    let files = collect_files(paths, &extensions)?;
    if files.is_empty() {
        anyhow::bail!("no files matched");
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut rows = Vec::new();
    let mut total = 0usize;

    for file in &files {
        bar.set_message(file.display().to_string());

        if let Some(text) = read_file(file) {
            let language = LanguageTag::from_path(file);
            let count = chunker.chunk(&text, language).len();
            total += count;
            rows.push((file, language, count));
        }

        bar.inc(1);
    }
    bar.finish_and_clear();

    for (file, language, count) in &rows {
        println!("{:>6}  {:<8} {}", count, language.as_str(), file.display());
    }
    println!(
        "\nTotal: {} chunk task(s) across {} file(s)",
        style(total).bold(),
        rows.len()
    );

    Ok(())
}

/// Read a file as text; unreadable files are logged and skipped, never
/// fatal to the run.
fn read_file(path: &std::path::Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("skipping {}: {e}", path.display());
            None
        }
    }
}
