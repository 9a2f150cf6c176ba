use anyhow::{Context, Result};
use snmp2::AsyncSession;

use super::oid::AdminStatusBinding;
use super::retry::{RetryPolicy, set_with_retry};

pub struct SnmpClientV2c {
    pub(crate) session: Box<AsyncSession>,
    policy: RetryPolicy,
}

impl SnmpClientV2c {
    pub async fn new(
        target: &str,
        community: &[u8],
        starting_req_id: i32,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let session = Box::pin(AsyncSession::new_v2c(target, community, starting_req_id))
            .await
            .context("Failed to create SNMPv2c session")?;

        Ok(Self {
            session: Box::new(session),
            policy,
        })
    }

    pub async fn set(&mut self, bindings: &[AdminStatusBinding]) -> Result<()> {
        set_with_retry(&mut self.session, bindings, self.policy).await
    }
}
