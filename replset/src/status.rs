use super::*;

/// Member state as reported by `replSetGetStatus`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(from = "i32")]
pub enum MemberState {
    Startup,
    Primary,
    Secondary,
    Recovering,
    Startup2,
    Unknown,
    Arbiter,
    Down,
    Rollback,
    Removed,
    Other(i32),
}

impl From<i32> for MemberState {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Startup,
            1 => Self::Primary,
            2 => Self::Secondary,
            3 => Self::Recovering,
            5 => Self::Startup2,
            6 => Self::Unknown,
            7 => Self::Arbiter,
            8 => Self::Down,
            9 => Self::Rollback,
            10 => Self::Removed,
            other => Self::Other(other),
        }
    }
}

impl From<MemberState> for i32 {
    fn from(state: MemberState) -> Self {
        match state {
            MemberState::Startup => 0,
            MemberState::Primary => 1,
            MemberState::Secondary => 2,
            MemberState::Recovering => 3,
            MemberState::Startup2 => 5,
            MemberState::Unknown => 6,
            MemberState::Arbiter => 7,
            MemberState::Down => 8,
            MemberState::Rollback => 9,
            MemberState::Removed => 10,
            MemberState::Other(code) => code,
        }
    }
}

impl MemberState {
    /// The member finished joining and takes part in the set.
    pub fn is_serving(self) -> bool {
        matches!(self, Self::Primary | Self::Secondary | Self::Arbiter)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MemberStatus {
    pub name: String,
    #[serde(default)]
    pub health: f64,
    pub state: MemberState,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ReplicaSetStatus {
    #[serde(default)]
    pub ok: f64,
    #[serde(rename = "myState", default)]
    pub my_state: Option<MemberState>,
    #[serde(default)]
    pub members: Vec<MemberStatus>,
}

impl ReplicaSetStatus {
    /// Status of a node that could not answer.
    pub fn unavailable() -> Self {
        Self {
            ok: 0.0,
            my_state: None,
            members: vec![],
        }
    }

    pub fn from_document(doc: Document) -> Result<Self> {
        let status = bson::from_document(doc).map_err(|e| Error::MalformedDocument {
            what: "replica set status",
            reason: e.to_string(),
        })?;
        Ok(status)
    }

    pub fn is_ok(&self) -> bool {
        self.ok == 1.0
    }

    pub fn member(&self, host: &MemberHost) -> Option<&MemberStatus> {
        self.members.iter().find(|m| host == m.name.as_str())
    }

    /// The node answering is a healthy primary.
    pub fn is_primary_ready(&self) -> bool {
        self.is_ok() && self.my_state == Some(MemberState::Primary)
    }

    /// `host` is healthy and has caught up with the set.
    pub fn is_member_ready(&self, host: &MemberHost) -> bool {
        if !self.is_ok() {
            return false;
        }
        match self.member(host) {
            Some(m) => m.health == 1.0 && m.state.is_serving(),
            None => false,
        }
    }
}
