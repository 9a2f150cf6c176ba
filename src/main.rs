use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{BufReader, stdin, stdout};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use snmp_ifadmin::config::AppConfig;
use snmp_ifadmin::job::JobRunner;
use snmp_ifadmin::snmp::{SnmpConnector, init_engine_id};
use snmp_ifadmin::stream::run_stream;

/// Включает или выключает интерфейсы через ifAdminStatus.
///
/// Задания читаются из stdin по одному JSON на строку, итоговые записи
/// пишутся в stdout.
#[derive(Debug, Parser)]
#[command(name = "snmp-ifadmin", version, about)]
struct Args {
    /// YAML файл с настройками транспорта и engine id
    #[arg(short, long, env = "SNMP_IFADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Подробные логи в stderr
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "snmp_ifadmin=debug"
    } else {
        "snmp_ifadmin=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout занят каналом заданий
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match Box::pin(run(args)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref())?;
    init_engine_id(config.engine_id()).context("Failed to initialise SNMP engine id")?;

    let runner = JobRunner::new(SnmpConnector::new(config.settings.connection.clone()))
        .with_max_interfaces(config.max_interfaces());
    debug!(max_interfaces = runner.max_interfaces(), "job runner ready");
    let jobs = run_stream(BufReader::new(stdin()), stdout(), &runner).await?;

    info!(jobs, "job stream closed");
    Ok(())
}
