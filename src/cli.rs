use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with Gemini from the terminal", long_about = None)]
pub struct Args {
    /// Message to send; starts an interactive session when omitted
    pub query: Option<String>,

    /// Start an interactive session even when a message is given
    #[arg(short, long)]
    pub chat: bool,

    /// Persona id (see /personas)
    #[arg(short, long)]
    pub persona: Option<String>,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key for the generative-language API
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// File to attach to the message (repeatable)
    #[arg(short, long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,

    /// Log requests to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
