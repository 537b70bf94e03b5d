use super::*;

use crate::params::State;

pub mod effect;
pub mod plan;
use plan::Plan;

/// What the caller asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub state: State,
    pub member: Option<MemberSpec>,
    /// Required to initiate with an explicit member.
    pub replica_set: Option<String>,
}

/// Result of one reconciliation.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub changed: bool,
    /// Config after the run, when the node has one.
    pub config: Option<ReplicaSetConfig>,
}

impl Outcome {
    fn unchanged(config: Option<ReplicaSetConfig>) -> Self {
        Self {
            changed: false,
            config,
        }
    }

    fn changed(config: Option<ReplicaSetConfig>) -> Self {
        Self {
            changed: true,
            config,
        }
    }
}

/// Drives a replica set to the requested state.
pub struct Reconciler<'a> {
    admin: &'a dyn ReplicaSetAdmin,
    policy: PollPolicy,
}

impl<'a> Reconciler<'a> {
    pub fn new(admin: &'a dyn ReplicaSetAdmin, policy: PollPolicy) -> Self {
        Self { admin, policy }
    }

    pub async fn run(&self, target: &Target) -> Result<Outcome> {
        match target.state {
            State::Initiated => {
                effect::initiate::Effect {
                    admin: self.admin,
                    policy: &self.policy,
                }
                .exec(target.member.as_ref(), target.replica_set.as_deref())
                .await
            }
            State::Present => {
                let member = self.member(target)?;
                effect::add_member::Effect {
                    admin: self.admin,
                    policy: &self.policy,
                }
                .exec(member)
                .await
            }
            State::Absent => {
                let member = self.member(target)?;
                effect::remove_member::Effect {
                    admin: self.admin,
                    policy: &self.policy,
                }
                .exec(member)
                .await
            }
        }
    }

    fn member<'t>(&self, target: &'t Target) -> Result<&'t MemberSpec> {
        let member = target.member.as_ref().ok_or_else(|| {
            Error::InvalidParameter(format!("member must be specified on state={}", target.state))
        })?;
        Ok(member)
    }
}

/// `replSetReconfig`, tolerating the connection drop that comes with it.
///
/// The primary closes client connections when its config changes, so a lost
/// connection does not mean the command failed. The waiter that follows
/// tells.
async fn push_config(admin: &dyn ReplicaSetAdmin, config: &ReplicaSetConfig) -> Result<()> {
    match admin.reconfigure(config).await {
        Err(e) if Error::is_connection_lost(&e) => {
            warn!("connection dropped during replSetReconfig: {e}");
            Ok(())
        }
        res => res,
    }
}
