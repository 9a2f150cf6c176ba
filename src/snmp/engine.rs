use std::fmt;
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};

/// snmpEngineID авторитетного агента (RFC 3411: от 5 до 32 октетов)
#[derive(Clone, PartialEq, Eq)]
pub struct EngineId(Vec<u8>);

impl EngineId {
    /// Парсит hex-строку, регистр не важен, префикс `0x` допускается
    pub fn from_hex(raw: &str) -> Result<Self> {
        let digits = raw.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);

        let bytes =
            hex::decode(digits).with_context(|| format!("engine id '{}' is not valid hex", raw))?;

        if !(5..=32).contains(&bytes.len()) {
            bail!(
                "engine id must be 5-32 octets, got {} in '{}'",
                bytes.len(),
                raw
            );
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineId({})", hex::encode_upper(&self.0))
    }
}

/// Глобальный engine id процесса. `None` внутри означает, что engine id
/// узнаётся у агента при инициализации сессии.
static GLOBAL_ENGINE_ID: OnceLock<Option<EngineId>> = OnceLock::new();

/// Устанавливает engine id процесса. Повторный вызов с тем же значением
/// ничего не меняет, с другим значением возвращает ошибку.
pub fn init_engine_id(raw: Option<&str>) -> Result<()> {
    let parsed = raw.map(EngineId::from_hex).transpose()?;
    let stored = GLOBAL_ENGINE_ID.get_or_init(|| parsed.clone());

    if *stored != parsed {
        bail!(
            "engine id already initialised to {:?}, refusing to change it to {:?}",
            stored,
            parsed
        );
    }
    Ok(())
}

/// Возвращает engine id, заданный через [`init_engine_id`]
pub fn engine_id() -> Result<Option<&'static EngineId>> {
    match GLOBAL_ENGINE_ID.get() {
        Some(id) => Ok(id.as_ref()),
        None => bail!("SNMP engine id has not been initialised"),
    }
}
