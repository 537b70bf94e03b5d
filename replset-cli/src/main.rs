use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use replset::admin::MongoAdmin;
use replset::params::Params;
use replset::reconcile::Reconciler;
use replset::report::Report;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let cli = args::Cli::parse();
    let report = match run(cli).await {
        Ok(report) => report,
        Err(e) => {
            error!("{e:#}");
            Report::failure(&e)
        }
    };

    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    }
    if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(cli: args::Cli) -> Result<Report> {
    let invocation = cli.into_params()?.validate()?;
    debug!("{invocation:?}");

    let admin = MongoAdmin::connect(&invocation.connection).await?;
    let outcome = Reconciler::new(&admin, invocation.policy)
        .run(&invocation.target)
        .await?;

    Ok(Report::success(&invocation, outcome))
}

/// Logs go to stderr. Stdout carries the report only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();
    tracing_subscriber::fmt()
        .event_format(format)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
