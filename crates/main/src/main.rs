use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use property_report::model::{Property, ReportInput};
use property_report::sample;
use property_report::source::{assemble_input, AnalysisCache};
use property_report::{ReportBuilder, ReportConfig, ReportGenerator};

/// Renders property investment reports from the command line.
///
/// `PROPERTY_REPORT_BRAND` and `PROPERTY_REPORT_CURRENCY` override the brand
/// and currency symbol; `RUST_LOG` controls logging.
#[derive(Parser)]
#[command(author, version, about = "Property investment report generator")]
struct Cli {
    /// Add a PDF outline entry per report section.
    #[arg(long, global = true)]
    bookmarks: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report JSON file into a directory under its download filename.
    #[command(name = "render")]
    Render {
        /// Report input (`{"property": ..., "analysis": ...}`), or a bare property with `--analyses`.
        input: PathBuf,
        /// JSON object mapping property ids to cached analyses.
        #[arg(long)]
        analyses: Option<PathBuf>,
        /// Output directory.
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Render a report JSON file and write the raw PDF bytes to stdout.
    #[command(name = "raw")]
    Raw {
        input: PathBuf,
        #[arg(long)]
        analyses: Option<PathBuf>,
    },

    /// Render the bundled sample reports into a directory.
    #[command(name = "sample", aliases = ["samples", "demo"])]
    Sample {
        #[arg(short, long, default_value = "target/sample_reports")]
        output_dir: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: report generation failed: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let generator = generator(cli.bookmarks);

    match cli.command {
        Commands::Render {
            input,
            analyses,
            output_dir,
        } => {
            let input = load_input(&input, analyses.as_ref())?;
            let report = generator.render(&input)?;
            let path = report.write_to_dir(&output_dir)?;
            println!(
                "Generated {} ({} pages, {} bytes)",
                path.display(),
                report.page_count,
                report.bytes.len()
            );
        }
        Commands::Raw { input, analyses } => {
            let input = load_input(&input, analyses.as_ref())?;
            let report = generator.render(&input)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&report.bytes)?;
            stdout.flush()?;
        }
        Commands::Sample { output_dir } => {
            for input in [sample::via_garibaldi(), sample::lisbon_showcase()] {
                let report = generator.render(&input)?;
                let path = report.write_to_dir(&output_dir)?;
                println!("Generated {} ({} pages)", path.display(), report.page_count);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "bookmarks")]
fn generator(bookmarks: bool) -> ReportGenerator {
    ReportBuilder::from_config(ReportConfig::from_env())
        .with_bookmarks(bookmarks)
        .build()
}

#[cfg(not(feature = "bookmarks"))]
fn generator(bookmarks: bool) -> ReportGenerator {
    if bookmarks {
        log::warn!("--bookmarks needs the `bookmarks` feature; rendering without an outline");
    }
    ReportBuilder::from_config(ReportConfig::from_env()).build()
}

fn load_input(path: &Path, analyses: Option<&PathBuf>) -> Result<ReportInput, Box<dyn Error>> {
    match analyses {
        None => Ok(ReportInput::from_path(path)?),
        Some(cache_path) => {
            let cache = AnalysisCache::from_path(cache_path)?;
            info!("loaded {} cached analyses", cache.len());
            let property = Property::from_path(path)?;
            Ok(assemble_input(property, &cache)?)
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
