use clap::{Parser, Subcommand};
use pdf_chat::Result;
use pdf_chat::commands::{SessionOverrides, run_ask, run_chat};
use pdf_chat::config::{run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-chat")]
#[command(about = "Ask questions about your PDFs using a hosted language model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the model provider and chunking settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Process PDFs and start an interactive chat about them
    Chat {
        /// PDF files to process before the first question
        files: Vec<PathBuf>,
        #[command(flatten)]
        overrides: SessionOverrides,
    },
    /// Process PDFs, answer the given questions and print the conversation
    Ask {
        /// PDF files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Questions to ask, in order
        #[arg(short = 'q', long = "question", required = true, num_args = 1..)]
        questions: Vec<String>,
        #[command(flatten)]
        overrides: SessionOverrides,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Chat { files, overrides } => {
            run_chat(&files, &overrides)?;
        }
        Commands::Ask {
            files,
            questions,
            overrides,
        } => {
            run_ask(&files, &questions, &overrides)?;
        }
    }

    Ok(())
}
