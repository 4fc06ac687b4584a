
use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::PdfChatError;
use crate::config::Config;
use crate::conversation::{
    AskOutcome, ConversationEngine, EngineSettings, IndexSummary, Session, SkipReason,
    Transcript,
};
use crate::embeddings::{EmbeddingProvider, OpenAiEmbeddings};
use crate::extractor::{PdfDocument, extract_text};
use crate::llm::{ChatModel, OpenAiChat};
use crate::provider::ApiClient;

/// Engine wired to the configured OpenAI-compatible provider
pub type PdfChatEngine = ConversationEngine<OpenAiEmbeddings, OpenAiChat>;

/// Per-run overrides of the stored configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::Args)]
pub struct SessionOverrides {
    /// Maximum characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Characters shared between neighbouring chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
    /// Number of chunks retrieved per question
    #[arg(long)]
    pub top_k: Option<usize>,
}

impl SessionOverrides {
    /// Apply the overrides to `config` and check the result is still valid
    #[inline]
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(chunk_size) = self.chunk_size {
            config.chunking.chunk_size = chunk_size;
        }
        if let Some(chunk_overlap) = self.chunk_overlap {
            config.chunking.chunk_overlap = chunk_overlap;
        }
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }

        config
            .validate()
            .context("Invalid command line overrides")?;
        Ok(())
    }
}

/// A line typed into the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Ask(String),
    Process(Vec<PathBuf>),
    History,
    Clear,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    #[inline]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let mut words = rest.split_whitespace();
        match words.next().unwrap_or_default() {
            "process" => Self::Process(words.map(PathBuf::from).collect()),
            "history" => Self::History,
            "clear" => Self::Clear,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Load the stored configuration with command line overrides applied
#[inline]
pub fn load_config(overrides: &SessionOverrides) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    overrides.apply(&mut config)?;
    Ok(config)
}

/// Create the conversation engine for `config`, sharing one HTTP client between both models
#[inline]
pub fn build_engine(config: &Config) -> Result<PdfChatEngine> {
    let client = ApiClient::new(&config.provider)
        .context("Failed to set up the model provider. Run 'pdf-chat config' to configure it")?;
    debug!("Using provider at {}", client.base_url());

    let embedder = OpenAiEmbeddings::with_client(client.clone(), &config.provider);
    let chat_model = OpenAiChat::with_client(client, &config.provider);

    Ok(ConversationEngine::new(
        embedder,
        chat_model,
        EngineSettings::from_config(config),
    ))
}

/// Read, extract and index `paths`, printing extraction warnings as they are found.
///
/// The session keeps its previous index if anything fails.
#[inline]
pub fn process_files<E: EmbeddingProvider, M: ChatModel>(
    engine: &ConversationEngine<E, M>,
    session: &mut Session,
    paths: &[PathBuf],
) -> crate::Result<IndexSummary> {
    info!("Processing {} files", paths.len());
    let documents = paths
        .iter()
        .map(|path| PdfDocument::from_path(path).map_err(|e| read_error(path, e)))
        .collect::<crate::Result<Vec<_>>>()?;

    let bar = spinner("Processing documents...");
    let extracted = extract_text(&documents);
    let extracted = match extracted {
        Ok(extracted) => extracted,
        Err(e) => {
            bar.finish_and_clear();
            return Err(e);
        }
    };

    for warning in &extracted.warnings {
        bar.suspend(|| eprintln!("{}", style(warning).yellow()));
    }

    let summary = engine.process_text(session, &extracted.text);
    bar.finish_and_clear();
    summary
}

/// Ask one question and print the updated transcript or a notice explaining why it was skipped
#[inline]
pub fn ask_question<E: EmbeddingProvider, M: ChatModel>(
    engine: &ConversationEngine<E, M>,
    session: &mut Session,
    question: &str,
) -> crate::Result<()> {
    let bar = spinner("Thinking...");
    let outcome = engine.ask(session, question);
    bar.finish_and_clear();

    match outcome? {
        AskOutcome::Answered(transcript) => {
            println!("{}", format_transcript(transcript));
        }
        AskOutcome::Skipped(SkipReason::NoDocuments) => {
            eprintln!(
                "{}",
                style("Please upload and process your PDFs first.").yellow()
            );
        }
        AskOutcome::Skipped(SkipReason::EmptyQuestion) => {
            debug!("Ignoring empty question");
        }
    }

    Ok(())
}

/// Interactive chat over `files`
#[inline]
pub fn run_chat(files: &[PathBuf], overrides: &SessionOverrides) -> Result<()> {
    let config = load_config(overrides)?;
    let engine = build_engine(&config)?;
    let mut session = Session::new();

    eprintln!("{}", style("Chat with multiple PDFs 📚").bold().cyan());
    eprintln!("Commands: /process <FILES>..., /history, /clear, /quit");
    eprintln!();

    if !files.is_empty() {
        report_processing(process_files(&engine, &mut session, files));
    }

    loop {
        let line: String = Input::new()
            .with_prompt("Your Prompt...")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        match ChatCommand::parse(&line) {
            ChatCommand::Ask(question) => {
                if let Err(e) = ask_question(&engine, &mut session, &question) {
                    error!("Question failed: {}", e);
                    eprintln!("{}", style(format!("Error: {}", e)).red());
                }
            }
            ChatCommand::Process(paths) if paths.is_empty() => {
                eprintln!("{}", style("Usage: /process <FILES>...").yellow());
            }
            ChatCommand::Process(paths) => {
                report_processing(process_files(&engine, &mut session, &paths));
            }
            ChatCommand::History => {
                if session.transcript().is_empty() {
                    eprintln!("No questions asked yet.");
                } else {
                    println!("{}", format_transcript(session.transcript()));
                }
            }
            ChatCommand::Clear => {
                session.transcript_mut().clear();
                eprintln!("{}", style("Conversation cleared.").green());
            }
            ChatCommand::Quit => break,
            ChatCommand::Unknown(command) => {
                eprintln!(
                    "{}",
                    style(format!("Unknown command: /{}", command)).yellow()
                );
            }
        }
    }

    Ok(())
}

/// Process `files`, ask every question in order, then print the transcript
#[inline]
pub fn run_ask(files: &[PathBuf], questions: &[String], overrides: &SessionOverrides) -> Result<()> {
    let config = load_config(overrides)?;
    let engine = build_engine(&config)?;
    let mut session = Session::new();

    let summary = process_files(&engine, &mut session, files)
        .context("Failed to process documents")?;
    eprintln!(
        "{}",
        style(format!("✓ Indexed {} chunks", summary.chunks)).green()
    );

    for question in questions {
        let outcome = engine
            .ask(&mut session, question)
            .with_context(|| format!("Failed to answer: {}", question))?;
        if let AskOutcome::Skipped(reason) = outcome {
            warn!("Skipped question {:?}: {:?}", question, reason);
        }
    }

    println!("{}", format_transcript(session.transcript()));
    Ok(())
}

/// Render the transcript oldest first, user lines in yellow and assistant lines in cyan
#[inline]
pub fn format_transcript(transcript: &Transcript) -> String {
    transcript
        .exchanges()
        .map(|(question, answer)| {
            format!(
                "{}\n\n{}",
                style(format!("You: {}", question)).yellow(),
                style(format!("Assistant: {}", answer)).cyan()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn report_processing(result: crate::Result<IndexSummary>) {
    match result {
        Ok(summary) => {
            eprintln!(
                "{}",
                style(format!("✓ Processed documents ({} chunks)", summary.chunks)).green()
            );
            if summary.transcript_cleared {
                eprintln!("Conversation cleared for the new documents.");
            }
        }
        Err(e) => {
            error!("Processing failed: {}", e);
            eprintln!("{}", style(format!("Error: {}", e)).red());
        }
    }
}

fn read_error(path: &Path, error: PdfChatError) -> PdfChatError {
    match error {
        PdfChatError::Io(e) => PdfChatError::Extraction {
            file_name: path.display().to_string(),
            message: e.to_string(),
        },
        other => other,
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = if console::user_attended_stderr() {
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    };
    bar.set_message(message);
    bar
}
