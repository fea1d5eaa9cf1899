use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use dictstruct::core::geometry::BBox;
use dictstruct::core::letter_rule::LetterRuleKind;
use dictstruct::export::TextExporter;
use dictstruct::parser::{HocrDirectory, PageSource};
use dictstruct::pipeline::{build_sections, export_reconstruction, FileConfig, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "dictstruct")]
#[command(version, about = "Recover the letter sections of a scanned dictionary from hOCR pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconstruct letter sections from a directory of hOCR files
    Run {
        /// Input folder with hOCR files to process
        input: PathBuf,

        /// Output directory for sections.json, diagnostics.jsonl, sections.txt and report.html
        /// (default: print the summary to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with region, page range and rule settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page where dictionary content starts (index starts with 0)
        #[arg(long)]
        start_page: Option<usize>,

        /// Page to stop before (default: last page)
        #[arg(long)]
        end_page: Option<usize>,

        /// Region holding the letter on title pages, as minX,minY,maxX,maxY
        #[arg(long, value_parser = parse_bbox)]
        title_region: Option<BBox>,

        /// Region holding the marginal reference words, as minX,minY,maxX,maxY
        #[arg(long, value_parser = parse_bbox)]
        index_region: Option<BBox>,

        /// How to react when reference words disagree with the current letter
        #[arg(long, value_enum)]
        letter_rule: Option<LetterRuleKind>,
    },

    /// List the pages found in an input folder, in processing order
    Info {
        /// Input folder with hOCR files
        input: PathBuf,
    },
}

fn parse_bbox(value: &str) -> Result<BBox, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            config,
            start_page,
            end_page,
            title_region,
            index_region,
            letter_rule,
        } => {
            let overrides = FileConfig {
                title_region,
                index_region,
                start_page,
                end_page,
                letter_rule,
            };
            let pipeline = PipelineConfig::resolve(input, config.as_deref(), overrides)?;
            run(&pipeline, output)
        }
        Commands::Info { input } => show_info(input),
    }
}

fn run(config: &PipelineConfig, output: Option<PathBuf>) -> Result<()> {
    if !config.input.is_dir() {
        anyhow::bail!("Input is not a directory: {}", config.input.display());
    }

    let reconstruction = build_sections(config)
        .with_context(|| format!("Failed to process {}", config.input.display()))?;

    match output {
        Some(dir) => {
            export_reconstruction(&reconstruction, &dir)
                .with_context(|| format!("Failed to export to: {}", dir.display()))?;
            log::info!("results saved to {}", dir.display());
        }
        None => print!("{}", TextExporter::render(&reconstruction)),
    }

    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    let source = HocrDirectory::open(&input)?;

    println!("hOCR pages in {}", input.display());
    println!("===============");
    for page_idx in 0..source.page_count() {
        let details = match source.load_page(page_idx) {
            Ok(page) => {
                let extent = page
                    .extent()
                    .map(|bbox| format!("{}x{}", bbox.x1 - bbox.x0, bbox.y1 - bbox.y0))
                    .unwrap_or_else(|| "?".to_string());
                format!("{} word(s), extent {extent}", page.words.len())
            }
            Err(err) => format!("unreadable: {err:#}"),
        };
        println!("{page_idx:>5}  {}  {details}", source.page_name(page_idx));
    }
    println!("Pages: {}", source.page_count());

    Ok(())
}
