//! Command-line front end for the Good PDF viewer core.
//!
//! Opens a document the same way the viewer does, then lists, saves or opens
//! its attachments, or reports what the page view would show.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use goodpdf::{ViewerConfig, ViewerSession, Viewport};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Good PDF - browse pages and attachments of a PDF document
#[derive(Parser)]
#[command(name = "goodpdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # List attachments with their sizes
    goodpdf attachments invoice.pdf

    # Save one attachment
    goodpdf save invoice.pdf factur-x.xml -o ./factur-x.xml

    # Zoom the second page to fit an 800x600 view
    goodpdf view report.pdf --page 2 --viewport 800x600 --fit")]
struct Cli {
    /// Log more (repeat for debug output). RUST_LOG overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for temporary copies of opened attachments
    #[arg(long, global = true)]
    temp_dir: Option<PathBuf>,

    /// Program used to open attachments instead of the system default
    #[arg(long, global = true)]
    opener: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count, first page size and attachment count
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    /// List the attachments of a PDF
    Attachments {
        input: PathBuf,
    },

    /// Save one attachment to disk
    Save {
        input: PathBuf,

        /// Attachment name as shown by `attachments`
        name: String,

        /// Destination file (default: ./<name>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save every attachment into a directory
    Extract {
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "attachments")]
        output: PathBuf,
    },

    /// Open one attachment with the system's default application
    Open {
        input: PathBuf,

        name: String,
    },

    /// Report the page label, zoom and rendered size of a page
    View(ViewArgs),
}

#[derive(Args)]
struct ViewArgs {
    input: PathBuf,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Size of the view as WIDTHxHEIGHT pixels
    #[arg(long, default_value = "800x600", value_parser = parse_viewport)]
    viewport: Viewport,

    /// Zoom so the whole page fits the view
    #[arg(long, conflicts_with = "fill")]
    fit: bool,

    /// Zoom so the page width fills the view
    #[arg(long)]
    fill: bool,

    /// Zoom-in steps applied afterwards
    #[arg(long, default_value_t = 0)]
    zoom_in: u32,

    /// Zoom-out steps applied afterwards
    #[arg(long, default_value_t = 0)]
    zoom_out: u32,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ViewerConfig {
        temp_dir: cli.temp_dir,
        opener: cli.opener,
        ..Default::default()
    };

    let result = match cli.command {
        Commands::Info { input } => cmd_info(input, config),
        Commands::Attachments { input } => cmd_attachments(input, config),
        Commands::Save {
            input,
            name,
            output,
        } => cmd_save(input, name, output, config),
        Commands::Extract { input, output } => cmd_extract(input, output, config),
        Commands::Open { input, name } => cmd_open(input, name, config),
        Commands::View(args) => cmd_view(args, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(input: &Path, config: ViewerConfig) -> Result<ViewerSession> {
    ViewerSession::open_with_config(input, config)
        .with_context(|| format!("Error opening file: {}", input.display()))
}

fn cmd_info(input: PathBuf, config: ViewerConfig) -> Result<()> {
    let session = open(&input, config)?;
    let first = session.page_size(0)?;

    println!("File: {}", input.display());
    println!("Pages: {}", session.page_count());
    println!("Page 1 size: {:.1} x {:.1} pt", first.width, first.height);
    println!("Attachments: {}", session.attachments().len());
    Ok(())
}

fn cmd_attachments(input: PathBuf, config: ViewerConfig) -> Result<()> {
    let session = open(&input, config)?;
    if !session.has_attachments() {
        println!("No attachments found");
        return Ok(());
    }
    for attachment in session.attachments() {
        println!("{}", attachment.display_label());
    }
    Ok(())
}

fn cmd_save(input: PathBuf, name: String, output: Option<PathBuf>, config: ViewerConfig) -> Result<()> {
    let session = open(&input, config)?;
    let dest = output.unwrap_or_else(|| PathBuf::from(&name));
    session
        .save_attachment(&name, &dest)
        .with_context(|| format!("Failed to save attachment '{name}'"))?;
    println!("Attachment saved to {}", dest.display());
    Ok(())
}

fn cmd_extract(input: PathBuf, output: PathBuf, config: ViewerConfig) -> Result<()> {
    let session = open(&input, config)?;
    if !session.has_attachments() {
        println!("This PDF does not contain any attachments.");
        return Ok(());
    }
    for attachment in session.attachments() {
        let written = attachment
            .save_to_dir(&output)
            .with_context(|| format!("Failed to save attachment '{}'", attachment.name))?;
        println!("{} -> {}", attachment.display_label(), written.display());
    }
    Ok(())
}

fn cmd_open(input: PathBuf, name: String, config: ViewerConfig) -> Result<()> {
    let session = open(&input, config)?;
    let path = session
        .open_attachment(&name)
        .with_context(|| format!("Failed to open attachment '{name}'"))?;
    println!("Opened {}", path.display());
    Ok(())
}

fn cmd_view(args: ViewArgs, config: ViewerConfig) -> Result<()> {
    let mut session = open(&args.input, config)?;
    if args.page == 0 {
        bail!("page numbers start at 1");
    }
    session.go_to_page(args.page - 1)?;

    if args.fit {
        session.fit_page(args.viewport)?;
    } else if args.fill {
        session.fill_page(args.viewport)?;
    }
    for _ in 0..args.zoom_in {
        session.zoom_in();
    }
    for _ in 0..args.zoom_out {
        session.zoom_out();
    }

    let (width, height) = session.rendered_size()?;
    println!("{}", session.cursor().label());
    println!("{}", session.status());
    println!("Mode: {}", session.zoom().mode());
    println!("Rendered size: {width} x {height} px");
    Ok(())
}

fn parse_viewport(s: &str) -> std::result::Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
    Ok(Viewport::new(width, height))
}
