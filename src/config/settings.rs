use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::job::DEFAULT_MAX_INTERFACES;

/// Базовые настройки приложения
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Настройки подключения
    pub connection: ConnectionSettings,
    /// Настройки SNMPv3
    pub v3: SnmpV3Settings,
    /// Ограничения на задание
    pub job: JobSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// UDP порт агента
    pub port: u16,
    /// Таймаут одной попытки (миллисекунды)
    pub timeout_ms: u64,
    /// Количество повторов после таймаута
    pub retries: u32,
    /// Разрядность request-id: 16 или 32
    pub request_id_bits: u8,
    /// Считать ошибкой ответ, OID в котором не совпадают с запросом
    pub report_oid_mismatch: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpV3Settings {
    /// snmpEngineID агента в hex; если не задан, берётся из discovery
    pub engine_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Максимум интерфейсов в одном задании
    pub max_interfaces: usize,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            max_interfaces: DEFAULT_MAX_INTERFACES,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: 161,
            timeout_ms: 5000,
            retries: 1,
            request_id_bits: 32,
            report_oid_mismatch: false,
        }
    }
}

impl ConnectionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Маска для стартового request-id
    pub fn request_id_mask(&self) -> i32 {
        match self.request_id_bits {
            16 => 0xFFFF,
            _ => i32::MAX,
        }
    }
}
