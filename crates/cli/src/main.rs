//! CLI entrypoint for the inboxpilot email assistant.

mod config;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use agent::{
    EmailAssistant, OpenAiProvider, QuestionReview, ScheduleMeetingReview, ToolRegistry,
    ToolReviewConfigs, WriteEmailReview, triage,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use proto::{AutoApproveHandler, EmailInput, ReviewHandler, Role};
use tools::{CheckCalendarTool, QuestionTool, ScheduleMeetingTool, WriteEmailTool};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::console::ConsoleReviewHandler;

/// Top-level command-line arguments.
#[derive(Parser)]
#[command(name = "inboxpilot")]
#[command(about = "Interrupt-driven human-in-the-loop email assistant", version = "0.1.0")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug logging to ~/.inboxpilot/logs/debug.log
    #[arg(long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Triage and answer one email, pausing for approval on every
    /// side-effecting tool call
    Run {
        /// Path to the email input JSON ({author, to, subject, email_thread})
        #[arg(short, long)]
        email: PathBuf,

        /// Approve every request automatically (no interactive reviewer)
        #[arg(long, default_value_t = false)]
        auto: bool,
    },

    /// Classify one email without answering it
    Triage {
        /// Path to the email input JSON
        #[arg(short, long)]
        email: PathBuf,
    },
}

fn init_tracing(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.debug {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let log_dir = PathBuf::from(home).join(".inboxpilot").join("logs");
        std::fs::create_dir_all(&log_dir).ok();
        let appender = tracing_appender::rolling::daily(&log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let console = fmt::layer().with_target(false).with_filter(console_filter);
        let file = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .with_filter(EnvFilter::new("debug,hyper_util=info,rustls=info"));
        tracing_subscriber::registry().with(console).with(file).init();
        Some(guard)
    } else {
        fmt()
            .with_env_filter(console_filter)
            .with_target(false)
            .init();
        None
    }
}

fn load_email(path: &PathBuf) -> anyhow::Result<EmailInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading email input {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing email input {}", path.display()))
}

fn build_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(WriteEmailTool);
    registry.register(ScheduleMeetingTool);
    registry.register(CheckCalendarTool);
    registry.register(QuestionTool);
    Arc::new(registry)
}

fn build_review_configs() -> ToolReviewConfigs {
    ToolReviewConfigs::new()
        .require_review("write_email", Arc::new(WriteEmailReview))
        .require_review("schedule_meeting", Arc::new(ScheduleMeetingReview))
        .require_review("Question", Arc::new(QuestionReview))
        .direct_execute("check_calendar_availability")
}

fn build_provider(config: &Config) -> anyhow::Result<Arc<OpenAiProvider>> {
    let api_key = config.resolve_api_key()?;
    let provider = match &config.llm.base_url {
        Some(base_url) => OpenAiProvider::with_base_url(api_key, base_url.clone()),
        None => OpenAiProvider::new(api_key),
    };
    Ok(Arc::new(provider))
}

async fn run(config: Config, email_path: PathBuf, auto: bool) -> anyhow::Result<()> {
    let email = load_email(&email_path)?;
    let provider = build_provider(&config)?;

    let reviewer: Arc<dyn ReviewHandler> = if auto {
        info!("Auto-approve mode: every request is accepted");
        Arc::new(AutoApproveHandler)
    } else {
        Arc::new(ConsoleReviewHandler)
    };

    let assistant = EmailAssistant::new(
        provider,
        build_registry(),
        build_review_configs(),
        reviewer,
        config.llm.model.clone(),
        config.agent.max_model_calls,
    );

    let state = assistant.run(email).await?;

    println!("\n=== Run complete ===");
    if let Some(classification) = state.classification {
        println!("Classification: {classification:?}");
    }
    for message in &state.messages {
        let label = match &message.role {
            Role::Tool => format!(
                "tool[{}]",
                message.tool_name.as_deref().unwrap_or("unknown")
            ),
            role => role.to_string(),
        };
        if message.content.is_empty() {
            if let Some(calls) = &message.tool_calls {
                let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
                println!("[{label}] requested tools: {}", names.join(", "));
                continue;
            }
        }
        println!("[{label}] {}", message.content);
    }
    Ok(())
}

async fn triage_only(config: Config, email_path: PathBuf) -> anyhow::Result<()> {
    let email = load_email(&email_path)?;
    let provider = build_provider(&config)?;

    let verdict = triage::classify(provider.as_ref(), &config.llm.model, &email).await?;
    println!("Classification: {:?}", verdict.classification);
    println!("Reasoning: {}", verdict.reasoning);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _file_guard = init_tracing(&cli);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { email, auto } => run(config, email, auto).await,
        Commands::Triage { email } => triage_only(config, email).await,
    }
}
