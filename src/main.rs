use anyhow::Context;
use clap::{Parser, Subcommand};
use ragkit::config::{load_env_file, Settings, API_KEY_HINT};
use ragkit::lessons;
use ragkit_llm::OpenAiClient;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Hands-on LLM lessons: streaming, chat memory, structured output and RAG
#[derive(Parser, Debug)]
#[command(name = "ragkit", version)]
#[command(about = "Hands-on LLM lessons", long_about = None)]
struct Args {
    #[command(subcommand)]
    lesson: Lesson,

    #[command(flatten)]
    settings: Settings,

    /// Log level (logs go to stderr)
    #[arg(long, env = "RAGKIT_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Lesson {
    /// Stream a first reply from the model
    FirstApp,
    /// Terminal chat with conversation memory
    Chat,
    /// Extract structured JSON from customer feedback
    SmartJson,
    /// Answer questions from an embedded document set
    Rag,
}

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so clap's env fallbacks see the file
    let env_file = load_env_file(None);
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting ragkit v{}", env!("CARGO_PKG_VERSION"));
    match env_file {
        Ok(true) => info!("Loaded .env"),
        Ok(false) => {}
        Err(e) => warn!("Ignoring .env: {}", e),
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            on_signal.cancel();
        }
    });

    match run(&args, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

async fn run(args: &Args, cancel: CancellationToken) -> anyhow::Result<()> {
    let config = args.settings.client_config()?;
    info!("Using {:?}", config);
    let client = OpenAiClient::new(config)?.with_cancellation(cancel.clone());
    let mut out = std::io::stdout();

    match args.lesson {
        Lesson::FirstApp => {
            lessons::first_app::run(&client, &mut out)
                .await
                .context("first-app lesson failed")?;
        }
        Lesson::Chat => {
            let input = lessons::chat::stdin_lines();
            let conversation = lessons::chat::run(&client, input, &mut out, &cancel)
                .await
                .context("chat lesson failed")?;
            info!("Chat ended after {} stored messages", conversation.stored_count());
        }
        Lesson::SmartJson => {
            lessons::smart_json::run(&client, &mut out)
                .await
                .context("smart-json lesson failed")?;
        }
        Lesson::Rag => {
            lessons::rag::run(&client, &client, &mut out)
                .await
                .context("rag lesson failed")?;
        }
    }
    Ok(())
}

/// Print `err` and pick the exit code
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ragkit_llm::Error>() {
        Some(ragkit_llm::Error::Cancelled) => {
            eprintln!("\nInterrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Some(ragkit_llm::Error::Configuration(_)) => {
            eprintln!("❌ Error: {:#}", err);
            eprintln!("\n🔧 {}", API_KEY_HINT);
            ExitCode::FAILURE
        }
        _ => {
            eprintln!("❌ Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
