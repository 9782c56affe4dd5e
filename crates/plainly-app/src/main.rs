use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use plainly_client::HttpSimplifier;
use plainly_config::Config;
use plainly_core::metric;
use plainly_core::preload::request_simplification;
use plainly_core::preprocess::{DefaultPreprocessor, Preprocessor};
use plainly_core::presenter::PresentedResult;
use plainly_core::LifecycleError;
use tokio::signal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
pub mod controller;
pub mod events;
pub mod flags;
pub mod io;
pub mod profile;
pub mod renderer;
pub mod state;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Commands};
use self::controller::AppController;
use self::flags::FlagStore;
use self::state::AppState;

/// Stdout carries the page protocol, so logs always go to stderr
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(atty::is(atty::Stream::Stderr)),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if !cli.launcher_args.is_empty() {
        tracing::info!("Launched by browser: {:?}", cli.launcher_args);
    }

    profile::init_user_config()?;
    let mut config = profile::load_user_profile(&cli.profile)?;
    let flag_store = FlagStore::load(FlagStore::default_path()?, config.default_flags);

    match cli.command.unwrap_or(Commands::Run { ws: None }) {
        Commands::Run { ws } => {
            if let Some(url) = ws {
                config.transport.listen_to_ws = true;
                config.transport.ws_url = url;
            }
            run(Arc::new(AppState::new(config, flag_store))).await
        }
        Commands::Flags { simplify, tts } => {
            let flags = if simplify.is_some() || tts.is_some() {
                flag_store.update(simplify.map(|t| t.is_on()), tts.map(|t| t.is_on()))?
            } else {
                flag_store.get()
            };
            println!("simplifyEnabled: {}", flags.simplify_enabled);
            println!("ttsEnabled: {}", flags.tts_enabled);
            Ok(())
        }
        Commands::Simplify { text } => simplify_once(&config, &flag_store, &text).await,
    }
}

pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    let drained = tokio::time::timeout(Duration::from_secs(2), async {
        while tasks.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!("Tasks did not stop in time, aborting");
        tasks.shutdown().await;
    }

    Ok(())
}

/// One request outside any page, for scripting and manual checks
async fn simplify_once(config: &Config, flags: &FlagStore, text: &str) -> anyhow::Result<()> {
    let text = DefaultPreprocessor.process(text);
    if text.is_empty() {
        return Err(LifecycleError::NoSelection.into());
    }

    let simplifier = HttpSimplifier::new(
        config.network.simplify_url(),
        config.network.request_timeout(),
    )?;
    let outcome = request_simplification(&simplifier, &text, flags.get()).await;
    let presented = PresentedResult::from_outcome(&outcome, &text);

    println!("{}", presented.simplified_text);
    if presented.is_success() {
        println!("{}", metric::difficulty_tooltip(presented.difficulty_drop()));
        Ok(())
    } else {
        anyhow::bail!("simplification did not succeed ({:?})", presented.status)
    }
}
