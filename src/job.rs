use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{CompletionRecord, CredentialParams, JobParams};
use crate::range::{count_interface_range, expand_interface_range};
use crate::snmp::security::ResolveError;
use crate::snmp::{
    AdminStatus, AdminStatusSession, SessionConnector, SessionCredentials, build_bindings,
    resolve_usm,
};
use crate::validate::{ValidationError, validate_device_ip, validate_interface_range};

/// Ошибка задания; `Display` совпадает с description в итоговой записи
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid SNMPv3 parameters: {0}")]
    Configuration(#[from] ResolveError),
    #[error("Supplied Interface ID String expands to no interfaces. Got: '{0}'")]
    EmptyRange(String),
    #[error(
        "Supplied Interface ID String expands to {count} interfaces, more than the allowed {max}. Got: '{raw}'"
    )]
    TooManyInterfaces { raw: String, count: u64, max: usize },
    #[error("Error setting OIDs:\n{0:#}")]
    Transport(anyhow::Error),
}

/// Этапы выполнения задания, строго по порядку
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Validating,
    Expanding,
    BuildingVarbinds,
    AwaitingSetResult,
    Done,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Expanding => "expanding",
            Self::BuildingVarbinds => "building-varbinds",
            Self::AwaitingSetResult => "awaiting-set-result",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Интерфейсов в задании по умолчанию
pub const DEFAULT_MAX_INTERFACES: usize = 1024;

/// Выполняет задания по одному через переданный коннектор
pub struct JobRunner<C> {
    connector: C,
    max_interfaces: usize,
}

impl<C: SessionConnector> JobRunner<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            max_interfaces: DEFAULT_MAX_INTERFACES,
        }
    }

    /// Задания, которые разворачиваются в большее число интерфейсов,
    /// отклоняются до открытия сессии
    pub fn with_max_interfaces(mut self, max_interfaces: usize) -> Self {
        self.max_interfaces = max_interfaces;
        self
    }

    pub fn max_interfaces(&self) -> usize {
        self.max_interfaces
    }

    #[cfg(test)]
    pub(crate) fn connector(&self) -> &C {
        &self.connector
    }

    /// Выполняет задание и возвращает ровно одну итоговую запись,
    /// только после того как SET завершился
    pub async fn run(&self, params: &JobParams) -> CompletionRecord {
        let record = match self.execute(params).await {
            Ok(()) => {
                info!(
                    device_ip = %params.device_ip,
                    interfaces = %params.interface_ids,
                    enabled = params.enabled,
                    "ifAdminStatus updated"
                );
                CompletionRecord::success()
            }
            Err(e) => {
                warn!(device_ip = %params.device_ip, error = %e, "job failed");
                CompletionRecord::failure(e.to_string())
            }
        };
        enter(JobStage::Done);
        record
    }

    async fn execute(&self, params: &JobParams) -> Result<(), JobError> {
        enter(JobStage::Validating);
        let target = validate_device_ip(&params.device_ip)?;
        validate_interface_range(&params.interface_ids)?;
        let credentials = resolve_credentials(&params.credentials)?;

        enter(JobStage::Expanding);
        let count = count_interface_range(&params.interface_ids);
        if count > self.max_interfaces as u64 {
            warn!(
                count,
                max_interfaces = self.max_interfaces,
                "interface range exceeds the per-job limit"
            );
            return Err(JobError::TooManyInterfaces {
                raw: params.interface_ids.clone(),
                count,
                max: self.max_interfaces,
            });
        }
        let indices = expand_interface_range(&params.interface_ids);
        if indices.is_empty() {
            return Err(JobError::EmptyRange(params.interface_ids.clone()));
        }

        enter(JobStage::BuildingVarbinds);
        let bindings = build_bindings(&indices, AdminStatus::from_enabled(params.enabled));
        debug!(count = bindings.len(), "built ifAdminStatus varbinds");

        enter(JobStage::AwaitingSetResult);
        // Сессии snmp2 большие, их future держим в куче
        let session = Box::pin(self.connector.connect(target, &credentials))
            .await
            .map_err(JobError::Transport)?;
        Box::pin(session.set(&bindings))
            .await
            .map_err(JobError::Transport)
    }
}

fn enter(stage: JobStage) {
    debug!(%stage, "job stage");
}

fn resolve_credentials(params: &CredentialParams) -> Result<SessionCredentials, JobError> {
    match params {
        CredentialParams::Community { snmp_community } => {
            Ok(SessionCredentials::Community(snmp_community.clone()))
        }
        CredentialParams::Usm(usm) => Ok(SessionCredentials::Usm(resolve_usm(usm)?)),
    }
}
