use clap::Parser;

mod app;
mod cli;
mod commands;
mod config;
mod conversation;
mod core;
mod display;
mod input;
mod parser;
mod provider;
mod session;
mod workspace;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::ChatError;
use crate::provider::OpenAiClient;
use crate::session::ChatSession;
use crate::workspace::{DirProject, WorkspaceStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    config.validate()?;

    let project_root = match &args.project {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let workspace = WorkspaceStore::new(Box::new(DirProject::new(project_root)));

    let provider = OpenAiClient::new(
        config.api_url.clone(),
        config.api_token.clone(),
        config.model.clone(),
        config.temperature,
        config.max_tokens,
        config.request_timeout(),
    )?;

    let dispatcher = create_command_registry();
    let session = ChatSession::new(config, workspace, Box::new(provider), dispatcher.clone());

    let mut application = Application::new(args, session, dispatcher);
    application.run().await
}
