use std::fmt;

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};

/// Запись задания, одна строка JSON от планировщика
#[derive(Debug, Clone, Deserialize)]
pub struct JobRequest {
    pub params: JobParams,
}

/// Параметры задания
#[derive(Debug, Clone, Deserialize)]
pub struct JobParams {
    pub device_ip: String,
    pub interface_ids: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub enabled: bool,
    #[serde(flatten)]
    pub credentials: CredentialParams,
}

/// Учётные данные в том виде, в котором они пришли в задании.
///
/// Если присутствует `snmp_username`, используется USM.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CredentialParams {
    Usm(UsmParams),
    Community { snmp_community: String },
}

#[derive(Clone, Deserialize)]
pub struct UsmParams {
    #[serde(alias = "username")]
    pub snmp_username: String,
    pub snmp_security_level: String,
    #[serde(default)]
    pub snmp_auth_proto: Option<String>,
    #[serde(default)]
    pub snmp_auth_key: Option<String>,
    #[serde(default)]
    pub snmp_priv_proto: Option<String>,
    #[serde(default)]
    pub snmp_priv_key: Option<String>,
}

impl fmt::Debug for UsmParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsmParams")
            .field("snmp_username", &self.snmp_username)
            .field("snmp_security_level", &self.snmp_security_level)
            .field("snmp_auth_proto", &self.snmp_auth_proto)
            .field("snmp_priv_proto", &self.snmp_priv_proto)
            .finish_non_exhaustive()
    }
}

/// Итоговая запись задания
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub complete: u8,
    pub code: u8,
    pub description: String,
}

impl CompletionRecord {
    pub const SUCCESS_DESCRIPTION: &'static str = "Command executed successfully.";

    pub fn success() -> Self {
        Self {
            complete: 1,
            code: 0,
            description: Self::SUCCESS_DESCRIPTION.to_string(),
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            complete: 1,
            code: 1,
            description: description.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Чекбоксы планировщик присылает как `0`/`1`, поэтому принимаем и bool,
/// и число, и строку.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Number(0) => Ok(false),
        Flag::Number(1) => Ok(true),
        Flag::Number(n) => Err(de::Error::invalid_value(
            Unexpected::Signed(n),
            &"a boolean, 0 or 1",
        )),
        Flag::Text(s) => match s.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(de::Error::invalid_value(
                Unexpected::Str(other),
                &"a boolean, 0 or 1",
            )),
        },
    }
}
