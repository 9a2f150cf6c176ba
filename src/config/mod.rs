use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub mod settings;

pub use settings::{ConnectionSettings, JobSettings, Settings, SnmpV3Settings};

use crate::snmp::MAX_BINDINGS_PER_SET;
use crate::snmp::engine::EngineId;

/// Главная конфигурация приложения
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Базовые настройки
    pub settings: Settings,
}

impl AppConfig {
    /// Загружает конфигурацию из YAML файла (если указан), затем применяет
    /// переменные окружения и проверяет результат
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_yaml_str(&content)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let settings: Settings = serde_yml::from_str(content).context("Invalid YAML")?;
        Ok(Self { settings })
    }

    /// Переменные окружения имеют приоритет над файлом
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection = &mut self.settings.connection;

        if let Some(port) = lookup("SNMP_PORT") {
            connection.port = port
                .parse()
                .with_context(|| format!("SNMP_PORT is not a port number: '{}'", port))?;
        }
        if let Some(timeout) = lookup("SNMP_TIMEOUT_MS") {
            connection.timeout_ms = timeout
                .parse()
                .with_context(|| format!("SNMP_TIMEOUT_MS is not a number: '{}'", timeout))?;
        }
        if let Some(retries) = lookup("SNMP_RETRIES") {
            connection.retries = retries
                .parse()
                .with_context(|| format!("SNMP_RETRIES is not a number: '{}'", retries))?;
        }
        if let Some(max) = lookup("SNMP_MAX_INTERFACES") {
            self.settings.job.max_interfaces = max
                .parse()
                .with_context(|| format!("SNMP_MAX_INTERFACES is not a number: '{}'", max))?;
        }
        if let Some(engine_id) = lookup("SNMP_ENGINE_ID") {
            self.settings.v3.engine_id = Some(engine_id).filter(|id| !id.trim().is_empty());
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let connection = &self.settings.connection;

        if connection.timeout_ms == 0 {
            bail!("connection.timeout_ms must be greater than zero");
        }
        if !matches!(connection.request_id_bits, 16 | 32) {
            bail!(
                "connection.request_id_bits must be 16 or 32, got {}",
                connection.request_id_bits
            );
        }
        let max_interfaces = self.settings.job.max_interfaces;
        if !(1..=MAX_BINDINGS_PER_SET).contains(&max_interfaces) {
            bail!(
                "job.max_interfaces must be between 1 and {}, got {}",
                MAX_BINDINGS_PER_SET,
                max_interfaces
            );
        }
        if let Some(engine_id) = &self.settings.v3.engine_id {
            EngineId::from_hex(engine_id).context("Invalid v3.engine_id")?;
        }

        Ok(())
    }

    pub fn max_interfaces(&self) -> usize {
        self.settings.job.max_interfaces
    }

    pub fn engine_id(&self) -> Option<&str> {
        self.settings.v3.engine_id.as_deref()
    }
}
