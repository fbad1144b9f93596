//! Vivo Push CLI - send pushes and query delivery statistics.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr as _;
use vivo_core::{
    BroadcastRequest, DeliveryEvent, DeliveryFailure, GatewayConfig, Payload, PushRequest,
    StatisticsEvent, TaskIds,
};
use vivo_push::{Pusher, StatisticsProvider, VivoClient};

#[derive(Parser)]
#[command(name = "vivo-push")]
#[command(about = "Push notifications through the vivo push gateway", long_about = None)]
struct Cli {
    /// TOML config file (credentials can come from VIVO_APP_* instead)
    #[arg(long, short, default_value = "vivo-push.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push to one or more registration IDs
    Send {
        /// Message payload as a JSON object
        #[arg(long)]
        payload: String,

        /// Delay between batches, in milliseconds
        #[arg(long, default_value_t = 0)]
        pacing_ms: u64,

        reg_ids: Vec<String>,
    },

    /// Push to every subscribed device
    Broadcast {
        /// Message payload as a JSON object
        #[arg(long)]
        payload: String,
    },

    /// Aggregate delivery statistics for comma-separated task IDs
    Stats { task_ids: String },
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = GatewayConfig::load(&cli.config)
        .wrap_err_with(|| format!("failed to load config from {}", cli.config.display()))?;
    let client = VivoClient::from_config(config).wrap_err("failed to create vivo client")?;

    match cli.command {
        Commands::Send {
            payload,
            pacing_ms,
            reg_ids,
        } => {
            let payload = parse_payload(&payload)?;
            let request = PushRequest::new(reg_ids, payload)
                .with_pacing(Duration::from_millis(pacing_ms));
            send(&client, request).await
        }
        Commands::Broadcast { payload } => {
            let payload = parse_payload(&payload)?;
            let report = client.push_all(BroadcastRequest::new(payload)).await;
            for failure in report.failures() {
                log_failure(failure);
            }
            print_json(&report)
        }
        Commands::Stats { task_ids } => stats(&client, TaskIds::from(task_ids.as_str())).await,
    }
}

fn parse_payload(raw: &str) -> color_eyre::eyre::Result<Payload> {
    serde_json::from_str(raw).wrap_err("payload must be a JSON object")
}

async fn send<P: Pusher>(pusher: &P, request: PushRequest) -> color_eyre::eyre::Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                DeliveryEvent::Success(reply) => {
                    tracing::info!(task_id = ?reply.task_id, "gateway accepted batch");
                }
                DeliveryEvent::Failure(failure) => log_failure(&failure),
                DeliveryEvent::Finished(_) => break,
            }
        }
    });

    let report = pusher.push(request.with_subscriber(tx)).await;
    progress.await.wrap_err("progress task failed")?;

    print_json(&report)
}

async fn stats<S: StatisticsProvider>(
    source: &S,
    task_ids: TaskIds,
) -> color_eyre::eyre::Result<()> {
    if task_ids.is_empty() {
        color_eyre::eyre::bail!("no task IDs given");
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let report = source.statistics(task_ids, Some(tx)).await;

    while let Ok(event) = rx.try_recv() {
        if let StatisticsEvent::PageFailed(failure) = event {
            tracing::warn!(
                page = failure.page,
                task_ids = %failure.task_ids.join(","),
                error = %failure.error,
                "statistics page skipped"
            );
        }
    }

    print_json(&report)
}

fn log_failure(failure: &DeliveryFailure) {
    match failure {
        DeliveryFailure::Error(e) => tracing::warn!(error = %e, "delivery failed"),
        DeliveryFailure::InvalidRecipients(ids) => {
            tracing::warn!(count = ids.len(), reg_ids = ?ids, "invalid recipients")
        }
    }
}

fn print_json<S: serde::Serialize>(value: &S) -> color_eyre::eyre::Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("failed to render report")?;
    println!("{}", rendered);
    Ok(())
}
