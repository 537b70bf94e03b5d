use super::*;

use crate::params::{Invocation, State};
use crate::reconcile::Outcome;

/// The JSON object printed for the caller.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Report {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl Report {
    pub fn success(invocation: &Invocation, outcome: Outcome) -> Self {
        let target = &invocation.target;
        let replica_set = outcome
            .config
            .as_ref()
            .map(|config| config.name.clone())
            .or_else(|| target.replica_set.clone());
        let config = outcome.config.and_then(|config| match bson::to_bson(&config) {
            Ok(doc) => Some(doc.into_relaxed_extjson()),
            Err(e) => {
                warn!("failed to render the config: {e}");
                None
            }
        });

        Self {
            changed: outcome.changed,
            failed: false,
            msg: None,
            state: Some(target.state),
            member: target.member.as_ref().map(|m| m.host.to_string()),
            replica_set,
            config,
        }
    }

    pub fn failure(e: &anyhow::Error) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: Some(format!("{e:#}")),
            state: None,
            member: None,
            replica_set: None,
            config: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let s = serde_json::to_string(self).context("failed to encode the report")?;
        Ok(s)
    }
}
