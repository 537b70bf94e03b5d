use super::*;

/// `replSetGetConfig` document.
///
/// Only the fields this crate reasons about are typed. Everything else the
/// server reports (`protocolVersion`, `settings`, ...) rides along in `extra`
/// and is sent back untouched on reconfiguration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReplicaSetConfig {
    #[serde(rename = "_id")]
    pub name: String,
    pub version: i64,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
    #[serde(flatten)]
    pub extra: Document,
}

/// One entry of the `members` array.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberConfig {
    #[serde(rename = "_id")]
    pub id: i32,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arbiter_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_indexes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slave_delay: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i32>,
    #[serde(flatten)]
    pub extra: Document,
}

impl MemberConfig {
    pub fn new(id: i32, host: impl Into<String>) -> Self {
        Self {
            id,
            host: host.into(),
            arbiter_only: None,
            build_indexes: None,
            hidden: None,
            priority: None,
            slave_delay: None,
            votes: None,
            extra: Document::new(),
        }
    }

    pub fn is_arbiter(&self) -> bool {
        self.arbiter_only.unwrap_or(false)
    }
}

/// Next free member `_id`: one past the highest in use, 0 for an empty set.
pub fn next_member_id(config: Option<&ReplicaSetConfig>) -> i32 {
    config
        .and_then(|config| config.members.iter().map(|m| m.id).max())
        .map_or(0, |max_id| max_id + 1)
}

impl ReplicaSetConfig {
    /// Config for `replSetInitiate` with `member` as its only member (`_id = 0`).
    pub fn initial(name: impl Into<String>, member: &MemberSpec) -> Self {
        Self {
            name: name.into(),
            version: 1,
            members: vec![member.to_config(0)],
            extra: Document::new(),
        }
    }

    pub fn from_document(doc: Document) -> Result<Self> {
        let config = bson::from_document(doc).map_err(|e| Error::MalformedDocument {
            what: "replica set config",
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    pub fn to_document(&self) -> Result<Document> {
        let doc = bson::to_document(self).context("failed to encode replica set config")?;
        Ok(doc)
    }

    pub fn member(&self, host: &MemberHost) -> Option<&MemberConfig> {
        self.members.iter().find(|m| host == m.host.as_str())
    }

    pub fn contains(&self, host: &MemberHost) -> bool {
        self.member(host).is_some()
    }

    /// Append `member` and bump the version.
    pub fn add_member(&mut self, member: MemberConfig) {
        self.members.push(member);
        self.version += 1;
    }

    /// Drop the entry for `host` and bump the version.
    /// Returns `None` and leaves the config as is when the host is not a member.
    pub fn remove_member(&mut self, host: &MemberHost) -> Option<MemberConfig> {
        let i = self.members.iter().position(|m| host == m.host.as_str())?;
        let removed = self.members.remove(i);
        self.version += 1;
        Some(removed)
    }
}
