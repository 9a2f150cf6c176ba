use anyhow::{Context, Result};
use snmp2::Oid;

use crate::range::InterfaceIndex;

/// ifAdminStatus из IF-MIB (ifTable.ifEntry.7)
pub const IF_ADMIN_STATUS: &str = "1.3.6.1.2.1.2.2.1.7";

/// Верхняя граница varbind'ов в одном SET.
///
/// Varbind ifAdminStatus занимает не больше 21 байта, 2048 штук вместе с
/// заголовками v3 укладываются в 65507-байтный буфер PDU snmp2.
pub const MAX_BINDINGS_PER_SET: usize = 2048;

/// Значение ifAdminStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminStatus {
    Up = 1,
    Down = 2,
}

impl AdminStatus {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Up } else { Self::Down }
    }

    pub fn as_integer(self) -> i64 {
        self as i64
    }
}

/// Одна пара OID/значение для SET запроса
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStatusBinding {
    pub oid: String,
    pub status: AdminStatus,
}

/// Строит по одному varbind на индекс, порядок и дубликаты сохраняются
pub fn build_bindings(
    indices: &[InterfaceIndex],
    status: AdminStatus,
) -> Vec<AdminStatusBinding> {
    indices
        .iter()
        .map(|index| AdminStatusBinding {
            oid: format!("{IF_ADMIN_STATUS}.{index}"),
            status,
        })
        .collect()
}

pub fn parse_oid(s: &str) -> Result<Oid<'static>> {
    let parts: Result<Vec<u64>, _> = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect();

    let parts = parts.context(format!("Invalid OID: {}", s))?;
    Oid::from(&parts).map_err(|e| anyhow::anyhow!("Failed to build OID from '{}': {:?}", s, e))
}
