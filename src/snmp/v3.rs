use anyhow::{Context, Result};
use snmp2::AsyncSession;
use snmp2::v3::{Auth, Security};

use super::engine::EngineId;
use super::oid::AdminStatusBinding;
use super::retry::{RetryPolicy, init_with_retry, set_with_retry};
use super::security::{SecurityLevel, UsmCredentials};

pub struct SnmpClientV3 {
    pub(crate) session: Box<AsyncSession>,
    policy: RetryPolicy,
}

impl SnmpClientV3 {
    /// Создаёт USM сессию под уровень безопасности из `credentials` и
    /// выполняет engine discovery
    pub async fn new(
        target: &str,
        credentials: &UsmCredentials,
        engine_id: Option<&EngineId>,
        starting_req_id: i32,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let security = build_security(credentials, engine_id)?;

        let mut session = Box::pin(AsyncSession::new_v3(target, starting_req_id, security))
            .await
            .map(Box::new)
            .context("Failed to create SNMPv3 session")?;

        init_with_retry(&mut session, policy).await?;

        Ok(Self { session, policy })
    }

    pub async fn set(&mut self, bindings: &[AdminStatusBinding]) -> Result<()> {
        set_with_retry(&mut self.session, bindings, self.policy).await
    }
}

fn build_security(credentials: &UsmCredentials, engine_id: Option<&EngineId>) -> Result<Security> {
    let auth_key = credentials
        .auth
        .as_ref()
        .map(|(_, key)| key.as_bytes())
        .unwrap_or_default();

    let mut security = Security::new(credentials.username.as_bytes(), auth_key);

    if let Some((algorithm, _)) = &credentials.auth {
        security = security.with_auth_protocol(algorithm.to_protocol());
    }

    let auth = match (credentials.level, &credentials.privacy) {
        (SecurityLevel::NoAuthNoPriv, _) => Auth::NoAuthNoPriv,
        (SecurityLevel::AuthNoPriv, _) => Auth::AuthNoPriv,
        (SecurityLevel::AuthPriv, Some((algorithm, key))) => {
            // Метод удлинения нужен до with_engine_id: там уже считаются ключи
            if let Some(extension) = algorithm.key_extension() {
                security = security.with_key_extension_method(extension);
            }
            Auth::AuthPriv {
                cipher: algorithm.to_cipher(),
                privacy_password: key.as_bytes().to_vec(),
            }
        }
        (SecurityLevel::AuthPriv, None) => {
            anyhow::bail!("authPriv session requires privacy credentials")
        }
    };
    security = security.with_auth(auth);

    if let Some(engine_id) = engine_id {
        security = security
            .with_engine_id(engine_id.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to apply engine id {:?}: {}", engine_id, e))?;
    }

    Ok(security)
}
