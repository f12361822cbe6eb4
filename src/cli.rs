use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytqa",
    about = "Summarize YouTube videos and ask questions about them",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Preferred caption language
    #[arg(short, long, global = true)]
    pub lang: Option<String>,

    /// LLM model (gemini-*, claude-*, or an OpenAI model)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Show video and model details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize a video's captions in bullet points
    Summarize {
        /// YouTube watch URL (https://www.youtube.com/watch?v=ID)
        url: String,
    },

    /// Answer a question about a video's captions
    Ask {
        /// YouTube watch URL (https://www.youtube.com/watch?v=ID)
        url: String,

        /// Question to answer from the transcript
        question: String,
    },

    /// Print the assembled caption transcript
    Transcript {
        /// YouTube watch URL (https://www.youtube.com/watch?v=ID)
        url: String,
    },

    /// Load a video, then summarize it or ask questions interactively
    Interactive {
        /// YouTube watch URL to load first
        url: Option<String>,
    },
}
