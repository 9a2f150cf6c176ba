use std::fmt;
use std::str::FromStr;

use snmp2::v3::{AuthProtocol, Cipher, KeyExtension};
use thiserror::Error;

use crate::models::job::UsmParams;

/// Минимальная длина USM пароля (RFC 3414, 11.2)
pub const MIN_KEY_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown {field} '{value}'")]
    Unknown { field: &'static str, value: String },
    #[error("{field} is required for security level {level}")]
    Missing {
        field: &'static str,
        level: SecurityLevel,
    },
    #[error("{field} must be at least {MIN_KEY_LEN} characters long")]
    KeyTooShort { field: &'static str },
}

/// Уровень безопасности USM сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    NoAuthNoPriv,
    AuthNoPriv,
    AuthPriv,
}

impl SecurityLevel {
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::NoAuthNoPriv)
    }

    pub fn requires_privacy(self) -> bool {
        matches!(self, Self::AuthPriv)
    }
}

impl FromStr for SecurityLevel {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "noAuthNoPriv" => Ok(Self::NoAuthNoPriv),
            "authNoPriv" => Ok(Self::AuthNoPriv),
            "authPriv" => Ok(Self::AuthPriv),
            _ => Err(ResolveError::Unknown {
                field: "snmp_security_level",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAuthNoPriv => write!(f, "noAuthNoPriv"),
            Self::AuthNoPriv => write!(f, "authNoPriv"),
            Self::AuthPriv => write!(f, "authPriv"),
        }
    }
}

/// Алгоритм аутентификации в том виде, в котором его присылает задание
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAlgorithm {
    Md5,
    Sha,
    Sha256,
    Sha512,
}

impl AuthAlgorithm {
    pub fn to_protocol(self) -> AuthProtocol {
        match self {
            Self::Md5 => AuthProtocol::Md5,
            Self::Sha => AuthProtocol::Sha1,
            Self::Sha256 => AuthProtocol::Sha256,
            Self::Sha512 => AuthProtocol::Sha512,
        }
    }
}

impl FromStr for AuthAlgorithm {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha" => Ok(Self::Sha),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ResolveError::Unknown {
                field: "snmp_auth_proto",
                value: s.to_string(),
            }),
        }
    }
}

/// Алгоритм шифрования.
///
/// `aes256b` и `aes256r` используют один шифр [`Cipher::Aes256`] и различаются
/// способом удлинения ключа: Blumenthal и Reeder соответственно.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivAlgorithm {
    Des,
    Aes,
    Aes256B,
    Aes256R,
}

impl PrivAlgorithm {
    pub fn to_cipher(self) -> Cipher {
        match self {
            Self::Des => Cipher::Des,
            Self::Aes => Cipher::Aes128,
            Self::Aes256B | Self::Aes256R => Cipher::Aes256,
        }
    }

    /// Удлинение ключа для AES-256, если аутентификация даёт короткий Kul
    pub fn key_extension(self) -> Option<KeyExtension> {
        match self {
            Self::Des | Self::Aes => None,
            Self::Aes256B => Some(KeyExtension::Blumenthal),
            Self::Aes256R => Some(KeyExtension::Reeder),
        }
    }
}

impl FromStr for PrivAlgorithm {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "des" => Ok(Self::Des),
            "aes" => Ok(Self::Aes),
            "aes256b" => Ok(Self::Aes256B),
            "aes256r" => Ok(Self::Aes256R),
            _ => Err(ResolveError::Unknown {
                field: "snmp_priv_proto",
                value: s.to_string(),
            }),
        }
    }
}

/// Разрешённые параметры USM пользователя, готовые для сессии
#[derive(Clone, PartialEq, Eq)]
pub struct UsmCredentials {
    pub username: String,
    pub level: SecurityLevel,
    pub auth: Option<(AuthAlgorithm, String)>,
    pub privacy: Option<(PrivAlgorithm, String)>,
}

// Ключи в логи не попадают
impl fmt::Debug for UsmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsmCredentials")
            .field("username", &self.username)
            .field("level", &self.level)
            .field("auth", &self.auth.as_ref().map(|(algo, _)| algo))
            .field("privacy", &self.privacy.as_ref().map(|(algo, _)| algo))
            .finish()
    }
}

/// Параметры сессии, по которым выбирается вариант клиента
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCredentials {
    Community(String),
    Usm(UsmCredentials),
}

/// Разрешает строковые параметры задания в типы протокола.
///
/// Алгоритмы и ключи проверяются только если их требует уровень безопасности.
pub fn resolve_usm(params: &UsmParams) -> Result<UsmCredentials, ResolveError> {
    let level: SecurityLevel = params.snmp_security_level.parse()?;

    let auth = if level.requires_auth() {
        let algo = required(params.snmp_auth_proto.as_deref(), "snmp_auth_proto", level)?;
        let key = required_key(params.snmp_auth_key.as_deref(), "snmp_auth_key", level)?;
        Some((algo.parse::<AuthAlgorithm>()?, key))
    } else {
        None
    };

    let privacy = if level.requires_privacy() {
        let algo = required(params.snmp_priv_proto.as_deref(), "snmp_priv_proto", level)?;
        let key = required_key(params.snmp_priv_key.as_deref(), "snmp_priv_key", level)?;
        Some((algo.parse::<PrivAlgorithm>()?, key))
    } else {
        None
    };

    Ok(UsmCredentials {
        username: params.snmp_username.clone(),
        level,
        auth,
        privacy,
    })
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    level: SecurityLevel,
) -> Result<&'a str, ResolveError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ResolveError::Missing { field, level })
}

fn required_key(
    value: Option<&str>,
    field: &'static str,
    level: SecurityLevel,
) -> Result<String, ResolveError> {
    let key = required(value, field, level)?;
    if key.chars().count() < MIN_KEY_LEN {
        return Err(ResolveError::KeyTooShort { field });
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(level: &str) -> UsmParams {
        UsmParams {
            snmp_username: "netops".to_string(),
            snmp_security_level: level.to_string(),
            snmp_auth_proto: Some("sha256".to_string()),
            snmp_auth_key: Some("authpass123".to_string()),
            snmp_priv_proto: Some("aes".to_string()),
            snmp_priv_key: Some("privpass123".to_string()),
        }
    }

    #[test]
    fn security_levels() {
        assert_eq!("noAuthNoPriv".parse(), Ok(SecurityLevel::NoAuthNoPriv));
        assert_eq!("authNoPriv".parse(), Ok(SecurityLevel::AuthNoPriv));
        assert_eq!("authPriv".parse(), Ok(SecurityLevel::AuthPriv));
        assert_eq!(
            "AuthPriv".parse::<SecurityLevel>(),
            Err(ResolveError::Unknown {
                field: "snmp_security_level",
                value: "AuthPriv".to_string(),
            })
        );
    }

    #[test]
    fn auth_algorithms_map_to_snmp2() {
        assert_eq!("md5".parse(), Ok(AuthAlgorithm::Md5));
        assert_eq!("sha".parse(), Ok(AuthAlgorithm::Sha));
        assert_eq!("sha256".parse(), Ok(AuthAlgorithm::Sha256));
        assert_eq!("sha512".parse(), Ok(AuthAlgorithm::Sha512));
        assert!(matches!(AuthAlgorithm::Md5.to_protocol(), AuthProtocol::Md5));
        assert!(matches!(AuthAlgorithm::Sha.to_protocol(), AuthProtocol::Sha1));
        assert!(matches!(AuthAlgorithm::Sha256.to_protocol(), AuthProtocol::Sha256));
        assert!(matches!(AuthAlgorithm::Sha512.to_protocol(), AuthProtocol::Sha512));
        assert!("sha384".parse::<AuthAlgorithm>().is_err());
    }

    #[test]
    fn priv_algorithms_map_to_snmp2() {
        assert!(matches!(PrivAlgorithm::Des.to_cipher(), Cipher::Des));
        assert!(matches!(PrivAlgorithm::Aes.to_cipher(), Cipher::Aes128));
        assert!(matches!(PrivAlgorithm::Aes256B.to_cipher(), Cipher::Aes256));
        assert!(matches!(PrivAlgorithm::Aes256R.to_cipher(), Cipher::Aes256));
        assert_eq!(PrivAlgorithm::Aes256B.key_extension(), Some(KeyExtension::Blumenthal));
        assert_eq!(PrivAlgorithm::Aes256R.key_extension(), Some(KeyExtension::Reeder));
        assert_eq!(PrivAlgorithm::Aes.key_extension(), None);
        assert_eq!(PrivAlgorithm::Des.key_extension(), None);
        assert_eq!("aes256b".parse(), Ok(PrivAlgorithm::Aes256B));
        assert_eq!("aes256r".parse(), Ok(PrivAlgorithm::Aes256R));
        assert!("3des".parse::<PrivAlgorithm>().is_err());
    }

    #[test]
    fn resolves_auth_priv() {
        let creds = resolve_usm(&params("authPriv")).unwrap();
        assert_eq!(creds.level, SecurityLevel::AuthPriv);
        assert_eq!(
            creds.auth,
            Some((AuthAlgorithm::Sha256, "authpass123".to_string()))
        );
        assert_eq!(
            creds.privacy,
            Some((PrivAlgorithm::Aes, "privpass123".to_string()))
        );
    }

    #[test]
    fn auth_no_priv_ignores_privacy_fields() {
        let mut p = params("authNoPriv");
        p.snmp_priv_proto = Some("rot13".to_string());
        let creds = resolve_usm(&p).unwrap();
        assert!(creds.auth.is_some());
        assert_eq!(creds.privacy, None);
    }

    #[test]
    fn no_auth_no_priv_needs_only_username() {
        let p = UsmParams {
            snmp_username: "monitor".to_string(),
            snmp_security_level: "noAuthNoPriv".to_string(),
            snmp_auth_proto: None,
            snmp_auth_key: None,
            snmp_priv_proto: None,
            snmp_priv_key: None,
        };
        let creds = resolve_usm(&p).unwrap();
        assert_eq!(creds.auth, None);
        assert_eq!(creds.privacy, None);
    }

    #[test]
    fn unknown_algorithm_is_an_error() {
        let mut p = params("authPriv");
        p.snmp_auth_proto = Some("sha1024".to_string());
        assert_eq!(
            resolve_usm(&p).unwrap_err().to_string(),
            "unknown snmp_auth_proto 'sha1024'"
        );

        let mut p = params("authPriv");
        p.snmp_priv_proto = Some("blowfish".to_string());
        assert_eq!(
            resolve_usm(&p).unwrap_err().to_string(),
            "unknown snmp_priv_proto 'blowfish'"
        );
    }

    #[test]
    fn missing_and_short_keys() {
        let mut p = params("authPriv");
        p.snmp_priv_key = None;
        assert_eq!(
            resolve_usm(&p).unwrap_err().to_string(),
            "snmp_priv_key is required for security level authPriv"
        );

        let mut p = params("authNoPriv");
        p.snmp_auth_key = Some("short".to_string());
        assert_eq!(
            resolve_usm(&p).unwrap_err(),
            ResolveError::KeyTooShort {
                field: "snmp_auth_key"
            }
        );
    }

    #[test]
    fn debug_output_hides_keys() {
        let creds = resolve_usm(&params("authPriv")).unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("authpass123"));
        assert!(!rendered.contains("privpass123"));
    }
}
