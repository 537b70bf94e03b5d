use super::*;

use crate::config::next_member_id;

/// Action that brings the deployment to the requested state.
#[derive(Clone, Debug, PartialEq)]
pub enum Plan {
    Unchanged,
    /// `replSetInitiate`, with an explicit config or letting the server build one.
    Initiate(Option<ReplicaSetConfig>),
    /// `replSetReconfig` with this config.
    Reconfigure(ReplicaSetConfig),
}

/// `set_name` is what the node reports via `isMaster`.
pub fn plan_initiate(
    set_name: Option<&str>,
    member: Option<&MemberSpec>,
    replica_set: Option<&str>,
) -> Result<Plan> {
    if let Some(name) = set_name {
        debug!("node already belongs to {name}");
        return Ok(Plan::Unchanged);
    }
    match (member, replica_set) {
        (None, _) => Ok(Plan::Initiate(None)),
        (Some(member), Some(name)) => Ok(Plan::Initiate(Some(ReplicaSetConfig::initial(
            name, member,
        )))),
        (Some(_), None) => bail!(Error::InvalidParameter(
            "replica_set must be specified when host is specified on state=initiated".to_string()
        )),
    }
}

/// Append `member` unless its host is already in the config.
pub fn plan_add(member: &MemberSpec, config: &ReplicaSetConfig) -> Plan {
    if config.contains(&member.host) {
        return Plan::Unchanged;
    }
    let mut new_config = config.clone();
    let id = next_member_id(Some(config));
    new_config.add_member(member.to_config(id));
    Plan::Reconfigure(new_config)
}

/// Drop `member` if its host is in the config.
pub fn plan_remove(member: &MemberSpec, config: &ReplicaSetConfig) -> Plan {
    let mut new_config = config.clone();
    match new_config.remove_member(&member.host) {
        Some(_) => Plan::Reconfigure(new_config),
        None => Plan::Unchanged,
    }
}
