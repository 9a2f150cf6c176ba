use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use snmp2::{AsyncSession, Oid, Value};
use tokio::time::timeout;
use tracing::debug;

use super::oid::{AdminStatusBinding, parse_oid};
use super::response::check_response;
use crate::config::ConnectionSettings;

/// Таймаут и количество повторов для одного запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retries: u32,
    pub report_oid_mismatch: bool,
}

impl RetryPolicy {
    pub fn from_settings(settings: &ConnectionSettings) -> Self {
        Self {
            timeout: settings.timeout(),
            retries: settings.retries,
            report_oid_mismatch: settings.report_oid_mismatch,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    pub fn timed_out(&self) -> anyhow::Error {
        anyhow::anyhow!(
            "Request timed out after {} attempt(s) ({} ms each)",
            self.attempts(),
            self.timeout.as_millis()
        )
    }
}

/// Стартовый request-id из часов, в пределах заданной разрядности
pub fn starting_request_id(mask: i32) -> i32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1);
    // 0 некоторые агенты отбрасывают
    ((nanos as i32) & mask).max(1)
}

/// Отправляет все varbind'ы одним SET запросом
pub async fn set_with_retry(
    session: &mut AsyncSession,
    bindings: &[AdminStatusBinding],
    policy: RetryPolicy,
) -> Result<()> {
    let oids = bindings
        .iter()
        .map(|binding| parse_oid(&binding.oid))
        .collect::<Result<Vec<Oid<'static>>>>()?;

    let values: Vec<(&Oid<'_>, Value<'_>)> = oids
        .iter()
        .zip(bindings)
        .map(|(oid, binding)| (oid, Value::Integer(binding.status.as_integer())))
        .collect();

    for attempt in 0..policy.attempts() {
        if attempt > 0 {
            debug!(attempt, "retrying SNMP SET");
        }

        match timeout(policy.timeout, Box::pin(session.set(&values))).await {
            Ok(Ok(pdu)) => return check_response(pdu, bindings, policy.report_oid_mismatch),
            Ok(Err(e)) => return Err(e).context("SNMP SET request failed"),
            Err(_) => debug!(attempt, "SNMP SET timed out"),
        }
    }

    Err(policy.timed_out())
}

/// Engine discovery для SNMPv3 под тем же таймаутом и повторами
pub async fn init_with_retry(session: &mut AsyncSession, policy: RetryPolicy) -> Result<()> {
    for attempt in 0..policy.attempts() {
        if attempt > 0 {
            debug!(attempt, "retrying SNMPv3 engine discovery");
        }

        match timeout(policy.timeout, Box::pin(session.init())).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => return Err(e).context("SNMPv3 engine discovery failed"),
            Err(_) => debug!(attempt, "SNMPv3 engine discovery timed out"),
        }
    }

    Err(policy.timed_out())
}
