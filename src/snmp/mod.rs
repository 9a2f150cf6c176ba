use std::future::Future;
use std::net::Ipv4Addr;

use anyhow::Result;
use tracing::debug;

pub mod clients_enum;
pub mod engine;
pub mod oid;
pub mod response;
pub mod retry;
pub mod security;
pub mod v2c;
pub mod v3;

pub use clients_enum::SnmpClient;
pub use engine::{EngineId, engine_id, init_engine_id};
pub use oid::{
    AdminStatus, AdminStatusBinding, IF_ADMIN_STATUS, MAX_BINDINGS_PER_SET, build_bindings,
    parse_oid,
};
pub use retry::RetryPolicy;
pub use security::{SessionCredentials, UsmCredentials, resolve_usm};
pub use v2c::SnmpClientV2c;
pub use v3::SnmpClientV3;

use crate::config::ConnectionSettings;

/// Сессия, которая умеет один раз выполнить SET.
///
/// `set` забирает сессию: после ответа (или ошибки) сокет освобождается.
pub trait AdminStatusSession {
    fn set(self, bindings: &[AdminStatusBinding]) -> impl Future<Output = Result<()>>;
}

/// Создаёт сессию под учётные данные задания
pub trait SessionConnector {
    type Session: AdminStatusSession;

    fn connect(
        &self,
        target: Ipv4Addr,
        credentials: &SessionCredentials,
    ) -> impl Future<Output = Result<Self::Session>>;
}

impl AdminStatusSession for SnmpClient {
    async fn set(self, bindings: &[AdminStatusBinding]) -> Result<()> {
        match self {
            SnmpClient::V2c(mut client) => Box::pin(client.set(bindings)).await,
            SnmpClient::V3(mut client) => Box::pin(client.set(bindings)).await,
        }
    }
}

/// Настоящий коннектор поверх snmp2
#[derive(Debug, Clone)]
pub struct SnmpConnector {
    settings: ConnectionSettings,
}

impl SnmpConnector {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }
}

impl SessionConnector for SnmpConnector {
    type Session = SnmpClient;

    async fn connect(
        &self,
        target: Ipv4Addr,
        credentials: &SessionCredentials,
    ) -> Result<SnmpClient> {
        let addr = format!("{}:{}", target, self.settings.port);
        let policy = RetryPolicy::from_settings(&self.settings);
        let req_id = retry::starting_request_id(self.settings.request_id_mask());

        match credentials {
            SessionCredentials::Community(community) => {
                debug!(%addr, "opening SNMPv2c session");
                let client = create_v2c_client(&addr, community.as_bytes(), req_id, policy);
                Box::pin(client).await
            }
            SessionCredentials::Usm(usm) => {
                debug!(
                    %addr,
                    username = %usm.username,
                    security_level = %usm.level,
                    "opening SNMPv3 session"
                );
                Box::pin(create_v3_client(&addr, usm, req_id, policy)).await
            }
        }
    }
}

pub async fn create_v2c_client(
    target: &str,
    community: &[u8],
    starting_req_id: i32,
    policy: RetryPolicy,
) -> Result<SnmpClient> {
    let client = SnmpClientV2c::new(target, community, starting_req_id, policy).await?;
    Ok(SnmpClient::V2c(client))
}

pub async fn create_v3_client(
    target: &str,
    credentials: &UsmCredentials,
    starting_req_id: i32,
    policy: RetryPolicy,
) -> Result<SnmpClient> {
    let engine_id = engine_id()?;
    let client =
        SnmpClientV3::new(target, credentials, engine_id, starting_req_id, policy).await?;
    Ok(SnmpClient::V3(client))
}
