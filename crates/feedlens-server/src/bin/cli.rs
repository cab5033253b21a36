//! Feedlens CLI
//!
//! Operator commands: probe the live model, translate text, and inspect the
//! stored feedback without going through the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use feedlens_core::gateway::reply;
use feedlens_core::{
    AnalysisMode, DatabaseConfig, FeedbackAnalysis, FeedbackFilter, Gateway, GeminiClient,
    GeminiConfig, LanguageModel, Sentiment, Storage, DEFAULT_TARGET_LANGUAGE,
};
use feedlens_server::logging;

/// Feedlens - multilingual feedback analysis CLI
#[derive(Parser)]
#[command(name = "feedlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the Feedlens feedback analysis service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full analysis against the live model (nothing is stored)
    Analyze {
        /// Feedback text
        text: String,
        /// Print the unprocessed model reply as well
        #[arg(long)]
        raw: bool,
    },

    /// Translate text with the live model
    Translate {
        /// Text to translate
        text: String,
        /// Target language
        #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
        to: String,
    },

    /// Show sentiment statistics for the configured database
    Stats,

    /// List stored feedback, newest first
    List {
        /// Only this ISO 639-1 language code
        #[arg(long)]
        language: Option<String>,
        /// Only this product
        #[arg(long)]
        product: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(false);

    match cli.command {
        Commands::Analyze { text, raw } => run_analyze(text, raw).await,
        Commands::Translate { text, to } => run_translate(text, to).await,
        Commands::Stats => run_stats(),
        Commands::List { language, product } => run_list(language, product),
    }
}

fn gateway() -> anyhow::Result<Gateway> {
    let config = GeminiConfig::from_env()?;
    let client = GeminiClient::new(config).context("Failed to create Gemini client")?;
    Ok(Gateway::new(Arc::new(client)))
}

fn storage() -> anyhow::Result<Storage> {
    let config = DatabaseConfig::from_env()?;
    Storage::open(&config.url).with_context(|| format!("Failed to open {}", config.url))
}

/// Run analyze command
async fn run_analyze(text: String, raw: bool) -> anyhow::Result<()> {
    let gateway = gateway()?;
    println!("{} {}", "Model:".white().bold(), gateway.model_name());

    let analysis: FeedbackAnalysis = if raw {
        let request = Gateway::request_for(&text, &AnalysisMode::FullAnalysis);
        let reply_text = gateway.model().generate(&request).await?;
        println!();
        println!("{}", "=== Raw Reply ===".yellow().bold());
        println!("{}", reply_text);
        reply::parse_reply(&reply_text)?
    } else {
        gateway.analyze_feedback(&text).await?
    };

    println!();
    println!("{}", "=== Analysis ===".cyan().bold());
    println!("{}: {}", "Language".white().bold(), analysis.language);
    println!("{}: {}", "Translated".white().bold(), analysis.translated_text);
    println!(
        "{}: {}",
        "Sentiment".white().bold(),
        colored_sentiment(&analysis.sentiment)
    );
    Ok(())
}

/// Run translate command
async fn run_translate(text: String, to: String) -> anyhow::Result<()> {
    let translation = gateway()?.translate(&text, &to).await?;
    println!("{} ({})", translation.translated_text, to.dimmed());
    Ok(())
}

/// Run stats command
fn run_stats() -> anyhow::Result<()> {
    let stats = storage()?.sentiment_stats()?;

    println!("{}", "=== Feedback Sentiment ===".cyan().bold());
    println!();
    println!("{}: {}", "Total Feedback".white().bold(), stats.total);

    if stats.total == 0 {
        println!("{}", "No feedback stored yet.".dimmed());
        return Ok(());
    }

    for sentiment in Sentiment::ALL {
        print_distribution_bar(sentiment, stats.count(sentiment), stats.percent(sentiment));
    }

    let unclassified = stats.total - stats.positive - stats.neutral - stats.negative;
    if unclassified > 0 {
        println!("  {} {}", unclassified, "with an unrecognized label".dimmed());
    }
    Ok(())
}

/// Run list command
fn run_list(language: Option<String>, product: Option<String>) -> anyhow::Result<()> {
    let records = storage()?.list_feedback(&FeedbackFilter { language, product })?;

    if records.is_empty() {
        println!("{}", "No feedback found.".dimmed());
        return Ok(());
    }

    for record in &records {
        println!(
            "{} {} [{}] {} {}",
            format!("#{}", record.id).white().bold(),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            record.language,
            record.product.cyan(),
            colored_sentiment(&record.sentiment),
        );
        println!("    {}", record.text_original);
        if record.text_translated != record.text_original {
            println!("    {} {}", "->".dimmed(), record.text_translated);
        }
    }
    println!();
    println!("{} record(s)", records.len());
    Ok(())
}

fn colored_sentiment(label: &str) -> colored::ColoredString {
    match Sentiment::from_label(label) {
        Some(Sentiment::Positive) => label.green(),
        Some(Sentiment::Neutral) => label.yellow(),
        Some(Sentiment::Negative) => label.red(),
        None => label.white(),
    }
}

/// Print a distribution bar
fn print_distribution_bar(sentiment: Sentiment, count: i64, percentage: f64) {
    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);

    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let colored_bar = match sentiment {
        Sentiment::Positive => bar.green(),
        Sentiment::Neutral => bar.yellow(),
        Sentiment::Negative => bar.red(),
    };

    println!(
        "  {:10} [{:30}] {:>4} ({:>6.2}%)",
        sentiment.as_str(),
        colored_bar,
        count,
        percentage
    );
}
