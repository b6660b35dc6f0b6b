use anyhow::Result;
use clap::{Parser, Subcommand};
use litreview::commands::{Task, index_papers, list_models, run_task, search_index, show_status};
use litreview::config::{Config, run_interactive_config, show_config};
use litreview::paper::Paper;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "litreview")]
#[command(about = "Retrieval-augmented literature review assistant backed by Ollama")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure Ollama connection and settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Embed papers from a JSON file and save the index
    Index {
        /// JSON file holding one paper or a list of papers
        papers: PathBuf,
        /// Add to the existing index instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// Find the passages closest to a query
    Search {
        query: String,
        /// Number of results, defaults to the configured value
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Summarize a paper
    Summarize {
        /// JSON file describing the paper
        paper: PathBuf,
    },
    /// Extract the key points of a paper
    KeyPoints {
        paper: PathBuf,
    },
    /// Compare two papers
    Compare {
        first: PathBuf,
        second: PathBuf,
    },
    /// Suggest follow-up research questions for a paper
    Questions {
        paper: PathBuf,
    },
    /// Critically evaluate a paper's methodology
    Methodology {
        paper: PathBuf,
    },
    /// Draft a literature review outline for a topic
    Outline {
        topic: String,
    },
    /// List models available on the Ollama server
    Models,
    /// Show Ollama connectivity and index status
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Config { show } = cli.command {
        return if show {
            show_config()
        } else {
            run_interactive_config()
        };
    }

    let config = Config::load_default()?;

    match cli.command {
        Commands::Config { .. } => {}
        Commands::Index { papers, append } => index_papers(&config, &papers, append)?,
        Commands::Search { query, k } => search_index(&config, &query, k)?,
        Commands::Summarize { paper } => run_task(&config, &Task::Summarize(Paper::load(&paper)?))?,
        Commands::KeyPoints { paper } => run_task(&config, &Task::KeyPoints(Paper::load(&paper)?))?,
        Commands::Compare { first, second } => run_task(
            &config,
            &Task::Compare(Paper::load(&first)?, Paper::load(&second)?),
        )?,
        Commands::Questions { paper } => {
            run_task(&config, &Task::ResearchQuestions(Paper::load(&paper)?))?;
        }
        Commands::Methodology { paper } => {
            run_task(&config, &Task::Methodology(Paper::load(&paper)?))?;
        }
        Commands::Outline { topic } => run_task(&config, &Task::Outline(topic))?,
        Commands::Models => list_models(&config)?,
        Commands::Status => show_status(&config)?,
    }

    Ok(())
}
