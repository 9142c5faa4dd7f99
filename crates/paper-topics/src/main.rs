use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use paper_topics::config::{Lexicon, RankingMode, Settings};
use paper_topics::pipeline::DocumentProcessor;
use paper_topics::report;
use paper_topics::utils::logger::init_logger;

#[derive(Parser, Debug)]
#[command(
    name = "paper-topics",
    version,
    about = "Extract key topics and categories from exam past papers"
)]
struct Cli {
    /// Settings file (defaults to config/settings.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one or more documents (.docx, .txt, .md)
    Analyze(AnalyzeArgs),

    /// Load and validate settings and lexicon, then print them
    CheckConfig,
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Documents to analyze, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Rank two and three word phrases instead of single words
    #[arg(long)]
    phrases: bool,

    /// Segment documents into numbered questions
    #[arg(long, overrides_with = "no_questions")]
    questions: bool,

    /// Skip question segmentation
    #[arg(long, overrides_with = "questions")]
    no_questions: bool,

    /// Terms to report per document
    #[arg(long)]
    top_k: Option<usize>,

    /// Terms to report for the combined analysis
    #[arg(long)]
    pooled_top_k: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl AnalyzeArgs {
    fn apply(&self, settings: &mut Settings) {
        if self.phrases {
            settings.ranking.mode = RankingMode::Phrases;
        }
        if self.questions {
            settings.segmentation.enabled = true;
        }
        if self.no_questions {
            settings.segmentation.enabled = false;
        }
        if let Some(k) = self.top_k {
            settings.ranking.top_k = k;
        }
        if let Some(k) = self.pooled_top_k {
            settings.ranking.pooled_top_k = k;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    init_logger(settings.logging.directory.as_deref())?;

    let lexicon = Lexicon::load(&settings.lexicon).context("Failed to load lexicon")?;

    match cli.command {
        Command::CheckConfig => {
            let rendered =
                toml::to_string_pretty(&settings).context("Failed to render settings")?;
            println!("{}", rendered);
            println!(
                "# lexicon: {} stopwords, {} noise words, {} categories",
                lexicon.stopwords.len(),
                lexicon.domain_noise.len(),
                lexicon.categories.len()
            );
            for label in lexicon.category_labels() {
                println!("#   {}", label);
            }
            Ok(())
        }
        Command::Analyze(args) => {
            args.apply(&mut settings);
            settings.validate().context("Invalid command line options")?;

            info!(
                "🚀 Analyzing {} file(s), mode {:?}, questions {}",
                args.files.len(),
                settings.ranking.mode,
                settings.segmentation.enabled
            );

            let processor = DocumentProcessor::new(settings, Arc::new(lexicon));
            let batch = processor.process_batch(&args.files);

            let output = match args.format {
                OutputFormat::Text => report::render_text(&batch),
                OutputFormat::Json => {
                    report::render_json(&batch).context("Failed to serialize report")?
                }
            };
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }

            if batch.all_failed() {
                error!("❌ None of the {} file(s) could be analyzed", batch.failures.len());
                bail!("no documents could be analyzed");
            }

            Ok(())
        }
    }
}
