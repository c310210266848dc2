mod cli;
mod console;
mod metrics_runtime;
mod soak;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use spiraid_rs::bus::host::Host;
use spiraid_rs::device::fram::Fram;
use spiraid_rs::metrics::install_metrics_sink;

use crate::cli::{Cli, Command};
use crate::console::{Op, execute, run_console, spawn_service};
use crate::metrics_runtime::{MetricsEmitter, MetricsEvent, run_summary_loop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = cli.controller.to_config()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (event_tx, event_rx) = mpsc::channel::<MetricsEvent>(cli.controller.queue_cap.max(1));
    if !install_metrics_sink(MetricsEmitter::new(event_tx)) {
        warn!("metrics sink already installed");
    }
    let summary_task = tokio::spawn(run_summary_loop(event_rx, shutdown_rx.clone()));

    let mut host = config.build()?;
    if let Some(mode) = cli.controller.mode {
        host.set_mode(mode)
            .with_context(|| format!("setting startup mode {mode}"))?;
    }

    let host = match cli.command {
        Command::Read { addr } => one_shot(host, Op::Read(addr))?,
        Command::Write { addr, value } => one_shot(host, Op::Write(addr, value))?,
        Command::Mode { set } => one_shot(host, Op::Mode(set))?,
        Command::Status => one_shot(host, Op::Status)?,
        Command::Soak { ops, seed } => {
            let report = soak::run_soak(&mut host, ops, seed)?;
            if !report.mismatches.is_empty() {
                anyhow::bail!("soak found {} mismatches", report.mismatches.len());
            }
            host
        }
        Command::Console => {
            let (handle, service) =
                spawn_service(host, cli.controller.queue_cap, shutdown_rx.clone());
            run_console(handle).await?;
            let _ = shutdown_tx.send(true);
            service.await.context("controller service panicked")?
        }
    };

    host.adapter()
        .controller()
        .array()
        .flush()
        .context("flushing channel images")?;

    let _ = shutdown_tx.send(true);
    let summary = summary_task.await?;
    summary.log();
    info!("exit: transactions={}", summary.transactions());
    Ok(())
}

fn one_shot(mut host: Host<Fram>, op: Op) -> anyhow::Result<Host<Fram>> {
    let reply = execute(&mut host, op).with_context(|| format!("{op:?}"))?;
    println!("{reply}");
    Ok(host)
}
