//! CLI binary for hyde-rag.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hyde_rag::{AnswerSink, Pipeline, RagConfig, RagError, ScoredArticle, SearchMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Answer questions about recent news with HyDE re-ranking.
#[derive(Parser)]
#[command(name = "hyde-rag", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Answer a question from recent news articles.
    Ask {
        /// The question to answer.
        question: String,

        /// Override the number of ranked articles given to the answer
        /// prompt (default 5, or `pipeline.top_k` from the config file).
        #[arg(long)]
        top_k: Option<usize>,

        /// Stop after printing the ranked articles.
        #[arg(long)]
        no_answer: bool,

        /// Run the search queries concurrently.
        #[arg(long)]
        concurrent: bool,
    },

    /// Write a default configuration file.
    InitConfig {
        /// Destination path (defaults to the user config directory).
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Prints only the part of each rendering not yet on screen.
struct TerminalSink<W: Write + Send> {
    out: W,
    printed: usize,
}

impl<W: Write + Send> TerminalSink<W> {
    fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }
}

impl<W: Write + Send> AnswerSink for TerminalSink<W> {
    fn render(&mut self, text: &str) -> hyde_rag::Result<()> {
        let unseen = text.get(self.printed..).unwrap_or(text);
        self.out
            .write_all(unseen.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| RagError::Stream(format!("cannot write answer: {e}")))?;
        self.printed = text.len();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the answer on stdout stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hyde_rag=info,hyde_search=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ask {
            question,
            top_k,
            no_answer,
            concurrent,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(k) = top_k {
                config.pipeline.top_k = k;
            }
            if concurrent {
                config.news.search.mode = SearchMode::Concurrent;
            }
            run_ask(config, &question, no_answer).await
        }
        Command::InitConfig { path, force } => {
            let path = path
                .or(cli.config)
                .unwrap_or_else(RagConfig::default_config_path);
            init_config(&path, force)
        }
    }
}

/// Load the given file, else the default location if present, else defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<RagConfig> {
    if let Some(path) = path {
        return Ok(RagConfig::from_file(path)?);
    }
    let default = RagConfig::default_config_path();
    if default.is_file() {
        info!(path = %default.display(), "loading config");
        Ok(RagConfig::from_file(&default)?)
    } else {
        Ok(RagConfig::default())
    }
}

async fn run_ask(config: RagConfig, question: &str, no_answer: bool) -> anyhow::Result<()> {
    let keys = config.resolve_keys()?;
    let pipeline = Pipeline::from_config(&config, &keys)?;

    let retrieval = pipeline.retrieve(question).await?;
    println!("Queries:");
    for query in &retrieval.queries {
        println!("  - {query}");
    }
    print_ranking(&retrieval.ranked, config.pipeline.top_k);
    if no_answer {
        return Ok(());
    }

    println!("\nAnswer:");
    let mut sink = TerminalSink::new(std::io::stdout());
    let answer = pipeline.answer(question, &retrieval.ranked, &mut sink).await?;
    println!();
    info!(
        queries = retrieval.queries.len(),
        articles = retrieval.ranked.len(),
        chars = answer.chars().count(),
        "done"
    );
    Ok(())
}

fn print_ranking(ranked: &[ScoredArticle], limit: usize) {
    if ranked.is_empty() {
        println!("\nNo articles found.");
        return;
    }
    println!("\nRanked articles:");
    for (i, scored) in ranked.iter().take(limit).enumerate() {
        println!(
            "{:>3}. [{:.4}] {}\n       {}",
            i + 1,
            scored.score,
            scored.article.title,
            scored.article.url
        );
    }
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    RagConfig::default().save_to_file(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_sink_prints_only_new_text() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.render("Hel").expect("render");
        sink.render("Hello, ").expect("render");
        sink.render("Hello, wörld").expect("render");
        assert_eq!(String::from_utf8(sink.out).expect("utf8"), "Hello, wörld");
    }

    #[test]
    fn parses_ask_flags() {
        let cli = Cli::try_parse_from([
            "hyde-rag",
            "ask",
            "What happened?",
            "--top-k",
            "3",
            "--concurrent",
        ])
        .expect("parse");
        match cli.command {
            Command::Ask {
                question,
                top_k,
                no_answer,
                concurrent,
            } => {
                assert_eq!(question, "What happened?");
                assert_eq!(top_k, Some(3));
                assert!(!no_answer);
                assert!(concurrent);
            }
            Command::InitConfig { .. } => panic!("expected ask"),
        }
    }

    #[test]
    fn init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        init_config(&path, false).expect("first write");
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).expect("forced write");
        assert!(RagConfig::from_file(&path).is_ok());
    }
}
