use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use manual_config::{Config, LoadOptions};
use manual_docs::{format_timestamp, view_document, Catalog, CategoryFilter, DocumentSummary};
use manual_render::render_with;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut load = LoadOptions::default();
    if let Some(path) = cli.config {
        load = load.with_override_path(path);
    }
    let config = Config::load(load)?;
    debug!(layers = config.sources.layers.len(), "configuration loaded");

    match cli.command {
        Command::Render(args) => handle_render(&config, args),
        Command::List(args) => handle_list(&config, args),
        Command::Show(args) => handle_show(&config, args),
        Command::Categories(args) => handle_categories(&config, args),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        },
    };
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_render(config: &Config, args: RenderArgs) -> Result<i32> {
    let source = read_source(&args.path)
        .with_context(|| format!("Unable to read markdown from {}", args.path.display()))?;
    let html = render_with(&source, &config.render.to_options());
    info!(bytes_in = source.len(), bytes_out = html.len(), "rendered markdown");

    if !html.is_empty() {
        emit(&html)?;
    }
    Ok(0)
}

fn handle_list(config: &Config, args: ListArgs) -> Result<i32> {
    let ListArgs {
        docs,
        category,
        format,
    } = args;

    let catalog = load_catalog(config, docs.as_deref())?;
    let summaries = catalog.in_category(&category);

    let rendered = match format {
        ListFormat::Json => serde_json::to_string_pretty(&summaries)?,
        ListFormat::Plain => summaries
            .iter()
            .map(|summary| plain_row(summary, &config.library.date_format))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    if !rendered.is_empty() {
        emit(&rendered)?;
    }
    Ok(0)
}

fn handle_show(config: &Config, args: ShowArgs) -> Result<i32> {
    let ShowArgs { docs, id, format } = args;

    let catalog = load_catalog(config, docs.as_deref())?;
    let Some(document) = catalog.get(id) else {
        eprintln!("document {id} not found");
        return Ok(1);
    };

    let view = view_document(document, &config.render.to_options());
    match format {
        ShowFormat::Html => emit(&view.html)?,
        ShowFormat::Json => emit(&serde_json::to_string_pretty(&view)?)?,
    }
    Ok(0)
}

fn handle_categories(config: &Config, args: CategoriesArgs) -> Result<i32> {
    let catalog = load_catalog(config, args.docs.as_deref())?;
    let categories = catalog.categories();
    if !categories.is_empty() {
        emit(&categories.join("\n"))?;
    }
    Ok(0)
}

fn load_catalog(config: &Config, docs: Option<&Path>) -> Result<Catalog> {
    let path = docs.unwrap_or(config.library.docs_file.as_path());
    Ok(Catalog::load(path)?)
}

fn plain_row(summary: &DocumentSummary, date_format: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        summary.id,
        single_line(&summary.title),
        single_line(&summary.category),
        format_timestamp(&summary.created_at, date_format)
    )
}

/// Tabs and line breaks would split a plain row, so they become spaces.
fn single_line(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}

fn read_source(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

fn emit(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let written = handle.write_all(content.as_bytes()).and_then(|()| {
        if content.ends_with('\n') {
            Ok(())
        } else {
            handle.write_all(b"\n")
        }
    });
    match written {
        Ok(()) => {}
        Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
        Err(err) => return Err(err).context("Failed to write to stdout"),
    }

    match handle.flush() {
        Ok(()) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Render manual documents and browse a document export",
    propagate_version = true
)]
struct Cli {
    /// Configuration file applied on top of the discovered layers
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render Markdown to HTML
    Render(RenderArgs),
    /// List documents, newest first
    List(ListArgs),
    /// Print one document rendered to HTML
    Show(ShowArgs),
    /// List distinct categories
    Categories(CategoriesArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Markdown file, or `-` for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    path: PathBuf,
}

#[derive(Args)]
struct ListArgs {
    /// Document export to read (defaults to `library.docs_file`)
    #[arg(long, value_name = "PATH")]
    docs: Option<PathBuf>,
    /// Restrict to one category, or `all`
    #[arg(long, value_name = "NAME", default_value_t = CategoryFilter::All)]
    category: CategoryFilter,
    /// Output format
    #[arg(long, value_enum, default_value_t = ListFormat::Plain)]
    format: ListFormat,
}

#[derive(Args)]
struct ShowArgs {
    /// Document export to read (defaults to `library.docs_file`)
    #[arg(long, value_name = "PATH")]
    docs: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = ShowFormat::Html)]
    format: ShowFormat,
    /// Document id
    #[arg(value_name = "ID")]
    id: u64,
}

#[derive(Args)]
struct CategoriesArgs {
    /// Document export to read (defaults to `library.docs_file`)
    #[arg(long, value_name = "PATH")]
    docs: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShowFormat {
    Html,
    Json,
}
