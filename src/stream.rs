use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::formatter::JsonFormatter;
use crate::job::JobRunner;
use crate::models::CompletionRecord;
use crate::snmp::SessionConnector;

/// Читает задания построчно до EOF и на каждое пишет одну итоговую запись.
///
/// Следующая строка читается только после того, как запись предыдущего
/// задания записана и сброшена в `writer`.
pub async fn run_stream<R, W, C>(reader: R, mut writer: W, runner: &JobRunner<C>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: SessionConnector,
{
    let mut lines = reader.lines();
    let mut jobs = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read job record")? {
        if line.trim().is_empty() {
            continue;
        }

        let record = match JsonFormatter::parse_job(&line) {
            Ok(job) => {
                debug!(device_ip = %job.params.device_ip, "job received");
                runner.run(&job.params).await
            }
            Err(e) => {
                warn!(error = %e, "malformed job record");
                JsonFormatter::malformed(&e)
            }
        };

        write_record(&mut writer, &record).await?;
        jobs += 1;
    }

    Ok(jobs)
}

async fn write_record<W>(writer: &mut W, record: &CompletionRecord) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut json = JsonFormatter::to_json_string(record)?;
    json.push('\n');
    writer
        .write_all(json.as_bytes())
        .await
        .context("Failed to write completion record")?;
    writer.flush().await.context("Failed to flush completion record")
}
