use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod app;
mod attachment;
mod cli;
mod commands;
mod config;
mod conversation;
mod core;
mod display;
mod input;
mod persona;
mod providers;
mod session;
mod utils;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::ChatError;
use crate::providers::gemini::GeminiProvider;
use crate::session::Session;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "aiconnect=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, path = %Config::config_path().display(), "ignoring config file");
        Config::default()
    });
    let settings = config.resolve(&args);

    let provider = GeminiProvider::with_endpoint(settings.base_url, settings.api_key, settings.model);
    let mut session = Session::new(Box::new(provider));
    if let Some(id) = settings.persona.as_deref() {
        session.select_persona(id)?;
    }

    let mut app = Application::new(args, session, create_command_registry());
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args).await {
        display::display_error(&err);
        std::process::exit(1);
    }
}
