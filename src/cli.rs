use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// One-shot question for the model (or use --chat for a session)
    pub query: Option<String>,

    /// Start an interactive chat session
    #[arg(short, long)]
    pub chat: bool,

    /// Project directory used as the sandbox root (default: current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Model to use, overriding the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Chat-completions endpoint URL, overriding the configured one
    #[arg(long)]
    pub api_url: Option<String>,

    /// Project-relative file to send as context before the query
    #[arg(long, value_name = "PATH")]
    pub send_file: Option<String>,

    /// Accept proposed file writes without prompting
    #[arg(short, long)]
    pub yes: bool,
}
