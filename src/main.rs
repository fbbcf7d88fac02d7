use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lmchat::cli::Cli;
use lmchat::{
    ChatError, ChatSession, ChatbotConfig, MockLanguageModel, OpenAiCompletionClient,
    SelfTestHarness,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Loaded first so RUST_LOG can come from .env too.
    let dotenv = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the conversation.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => info!("No .env file loaded: {e}"),
    }

    let config = match ChatbotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("Erro: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut stdout = std::io::stdout();

    if cli.ci_test {
        info!("Self-test mode, configured server {} left untouched", config.base_url());
        let harness = SelfTestHarness::new(Arc::new(MockLanguageModel::new()));
        let passed = harness.run(&mut stdout).await;
        return Ok(if passed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let chat = OpenAiCompletionClient::new(&config)?;
    let probe = chat.with_temperature(config.probe_temperature());
    info!(
        "Chatting with {} (model={}, temperature={})",
        chat.endpoint(),
        config.model(),
        chat.temperature()
    );

    let session = ChatSession::new(Arc::new(chat)).with_probe_client(Arc::new(probe));
    let stdin = BufReader::new(tokio::io::stdin());

    match session.run(stdin, &mut stdout).await {
        Ok(end) => {
            info!("Session ended: {end:?}");
            Ok(ExitCode::SUCCESS)
        }
        // Already explained to the user on stdout.
        Err(e @ (ChatError::Connection(_) | ChatError::Construction(_))) => {
            info!("Session did not start: {e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
