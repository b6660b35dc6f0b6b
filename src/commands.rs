use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::index::SimilarityIndex;
use crate::ollama::OllamaClient;
use crate::paper::Paper;
use crate::rag::{Outcome, RetrievalAugmenter};
use crate::summarizer::Summarizer;

/// A summarizer task selectable from the command line
#[derive(Debug, Clone)]
pub enum Task {
    Summarize(Paper),
    KeyPoints(Paper),
    Compare(Paper, Paper),
    ResearchQuestions(Paper),
    Methodology(Paper),
    Outline(String),
}

fn open_index(config: &Config) -> Result<SimilarityIndex<OllamaClient>> {
    let client =
        OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    Ok(SimilarityIndex::new(client, config.index_path_prefix()))
}

/// Embed papers from a JSON file into the index and save it
#[inline]
pub fn index_papers(config: &Config, papers_path: &Path, append: bool) -> Result<()> {
    let papers = Paper::load_many(papers_path)?;
    if papers.is_empty() {
        println!("No papers found in {}", papers_path.display());
        return Ok(());
    }

    let mut index = open_index(config)?;
    if append {
        index.load().context("Failed to load existing index for appending")?;
        println!("Appending to index with {} passages", index.len());
    }

    let bar = if console::user_attended_stderr() {
        ProgressBar::new(papers.len() as u64).with_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        )
    } else {
        ProgressBar::hidden()
    };

    for paper in &papers {
        bar.set_message(paper.title.clone());
        let batch = paper.to_index_batch(&config.chunking);
        if batch.is_empty() {
            warn!("Paper '{}' has no indexable text, skipping", paper.title);
        } else if index.is_initialized() {
            index.add(&batch.documents, batch.metadata)?;
        } else {
            index.create(&batch.documents, batch.metadata)?;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if !index.is_initialized() {
        println!("Nothing to index.");
        return Ok(());
    }

    index.save().context("Failed to save index")?;
    info!("Indexed {} papers", papers.len());

    let paths = index.snapshot_paths();
    println!(
        "Indexed {} papers ({} passages, dimension {})",
        papers.len(),
        index.len(),
        index.dimension().unwrap_or_default()
    );
    println!("  Index: {}", paths.index.display());
    println!("  Metadata: {}", paths.metadata.display());

    Ok(())
}

/// Print the passages nearest to `query`
#[inline]
pub fn search_index(config: &Config, query: &str, k: Option<usize>) -> Result<()> {
    let mut index = open_index(config)?;
    index.load().context("Failed to load index")?;

    let k = k.unwrap_or(config.index.default_k);
    let results = index.search(query, k)?;

    if results.is_empty() {
        println!("No matching passages.");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let title = result
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Untitled");
        println!(
            "{}. {} {}",
            rank + 1,
            style(title).bold(),
            style(format!("(distance {:.4})", result.distance)).dim()
        );
        println!("   {}", result.content().replace('\n', "\n   "));
        println!();
    }

    Ok(())
}

/// Run one summarizer task against the saved index
#[inline]
pub fn run_task(config: &Config, task: &Task) -> Result<()> {
    let mut index = open_index(config)?;
    if let Err(e) = index.load() {
        // Retrieval degrades to no context; generation still runs
        warn!("Index unavailable, continuing without retrieval: {}", e);
    }

    let client =
        OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    let augmenter = RetrievalAugmenter::new(&index).with_context_k(config.index.context_k);
    let summarizer = Summarizer::new(augmenter, client, &config.ollama.generation_model);
    eprintln!(
        "{}",
        style(format!(
            "Generating with {} ({} context passages)",
            summarizer.model(),
            summarizer.augmenter().context_k()
        ))
        .dim()
    );

    let outcome = match task {
        Task::Summarize(paper) => summarizer.summarize_paper(paper),
        Task::KeyPoints(paper) => summarizer.extract_key_points(paper),
        Task::Compare(first, second) => summarizer.compare_papers(first, second),
        Task::ResearchQuestions(paper) => summarizer.research_questions(paper),
        Task::Methodology(paper) => summarizer.evaluate_methodology(paper),
        Task::Outline(topic) => summarizer.literature_review_outline(topic),
    };

    report_outcome(outcome);
    Ok(())
}

fn report_outcome(outcome: Outcome<String>) {
    if let Some(reason) = outcome.reason() {
        eprintln!("{} {}", style("⚠ Degraded:").yellow(), reason);
    }
    println!("{}", outcome.into_value().trim());
}

/// List models available on the Ollama server
#[inline]
pub fn list_models(config: &Config) -> Result<()> {
    let client =
        OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    let models = client.list_models()?;

    if models.is_empty() {
        println!("No models available. Pull one with 'ollama pull <model>'.");
        return Ok(());
    }

    println!("Available models ({}):", models.len());
    for model in &models {
        let size = model
            .details
            .as_ref()
            .and_then(|d| d.parameter_size.as_deref())
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        let role = if model.name == config.ollama.embedding_model {
            " (embedding)"
        } else if model.name == config.ollama.generation_model {
            " (generation)"
        } else {
            ""
        };
        println!("  {}{}{}", model.name, size, role);
    }

    Ok(())
}

/// Show Ollama connectivity and index state
#[inline]
pub fn show_status(config: &Config) -> Result<()> {
    println!("📊 Literature Review Status");
    println!("{}", "=".repeat(50));
    println!();

    println!("🤖 Ollama Status:");
    match OllamaClient::new(&config.ollama) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!("   ✅ Ollama: Connected ({})", client.base_url());
                println!("   📋 Embedding Model: {}", config.ollama.embedding_model);
                println!("   📋 Generation Model: {}", config.ollama.generation_model);
            }
            Err(e) => println!("   ⚠️  Ollama: Unhealthy - {:#}", e),
        },
        Err(e) => println!("   ❌ Ollama: Invalid configuration - {}", e),
    }

    println!();
    println!("🔍 Index Status:");
    let mut index = open_index(config)?;
    let paths = index.snapshot_paths().clone();
    println!("   📁 Index file: {}", paths.index.display());
    println!("   📁 Metadata file: {}", paths.metadata.display());

    if !paths.exists() {
        println!("   💤 No index saved yet. Run 'litreview index <papers.json>'.");
        return Ok(());
    }

    match index.load() {
        Ok(()) => {
            println!("   ✅ Passages: {}", index.len());
            println!(
                "   🔢 Dimension: {}",
                index.dimension().unwrap_or_default()
            );
            let mut titles: Vec<&str> = index
                .metadata()
                .iter()
                .filter_map(|m| m.get("title").and_then(serde_json::Value::as_str))
                .collect();
            titles.sort_unstable();
            titles.dedup();
            println!("   📚 Papers: {}", titles.len());
        }
        Err(e) => println!("   ❌ Failed to load index - {}", e),
    }

    Ok(())
}
