//! officemd CLI - Word and PowerPoint to Markdown conversion
//!
//! Converts a .docx or .pptx file into `index.md` plus an `images/`
//! directory of extracted pictures.

use clap::{ArgAction, Parser, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use officemd::{ConvertOptions, TablePlacement};
use std::path::PathBuf;

/// Office document to Markdown conversion
#[derive(Parser)]
#[command(
    name = "officemd",
    version,
    about = "Convert Word and PowerPoint files to Markdown",
    long_about = "officemd - Convert .docx and .pptx files to Markdown.\n\n\
                  Writes <OUTPUT>/index.md and extracts embedded pictures into <OUTPUT>/images/."
)]
struct Cli {
    /// Input .docx or .pptx file
    input: PathBuf,

    /// Output directory (default: sibling directory named after the input)
    output: Option<PathBuf>,

    /// Where Word tables are placed
    #[arg(long, default_value = "after-paragraphs")]
    tables: TableMode,

    /// Font size (pt) at which slide text becomes a heading
    #[arg(long, default_value_t = officemd::render::DEFAULT_HEADING_FONT_SIZE_PT)]
    heading_size: f32,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Table placement mode
#[derive(Clone, ValueEnum)]
enum TableMode {
    /// All tables after all paragraphs
    AfterParagraphs,
    /// Tables where they appear in the document
    DocumentOrder,
}

impl From<TableMode> for TablePlacement {
    fn from(mode: TableMode) -> Self {
        match mode {
            TableMode::AfterParagraphs => TablePlacement::AfterParagraphs,
            TableMode::DocumentOrder => TablePlacement::DocumentOrder,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // RUST_LOG wins over -v
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = cli
        .output
        .unwrap_or_else(|| officemd::default_output_dir(&cli.input));

    let options = ConvertOptions::new()
        .with_table_placement(cli.tables.into())
        .with_heading_font_size(cli.heading_size);

    let pb = create_spinner("Converting document...");
    let result = officemd::convert_file(&cli.input, &output, &options);
    pb.finish_and_clear();
    let report = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Markdown written to {}, images in {}",
        "✓".green().bold(),
        report.markdown_path.display(),
        report.images_dir.display()
    );
    if report.skipped_images > 0 {
        println!(
            "{} {} image references could not be resolved",
            "!".yellow().bold(),
            report.skipped_images
        );
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
