//! Status list interoperability test runner.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use credibil_interop::Args;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")?;

    let ctx = args.context()?;
    if ctx.implementations().is_empty() {
        tracing::warn!(tag = args.tag.as_str(), "no implementations to test");
    }

    let report = credibil_interop::run(&ctx, args.suite).await;
    report.write(&args.report_dir)?;

    let summary = report.summary();
    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        pending = summary.pending,
        report = %args.report_dir.display(),
        "finished"
    );

    Ok(if report.failed() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
