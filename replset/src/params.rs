use super::*;

use crate::admin::ConnectionSpec;
use crate::reconcile::Target;
use std::str::FromStr;

/// Desired state of the replica set.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// The connected node belongs to a replica set.
    Initiated,
    /// The member is in the config.
    Present,
    /// The member is not in the config.
    Absent,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "initiated" => Ok(Self::Initiated),
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            _ => Err(Error::InvalidParameter(format!(
                "value of state must be one of: initiated, present, absent, got: {s}"
            ))),
        }
    }
}

/// A password that stays out of `Debug` output.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// Parameters as handed over by the caller, before validation.
#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Params {
    #[serde(default = "default_login_host")]
    pub login_host: String,
    #[serde(default = "default_login_port", deserialize_with = "loose::number")]
    pub login_port: u16,
    #[serde(default)]
    pub login_user: Option<String>,
    #[serde(default)]
    pub login_password: Option<Password>,
    #[serde(default)]
    pub replica_set: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub ssl: bool,
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub arbiter_only: bool,
    #[serde(default = "yes", deserialize_with = "loose::boolean")]
    pub build_indexes: bool,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub hidden: bool,
    #[serde(default = "default_priority", deserialize_with = "loose::number")]
    pub priority: f64,
    #[serde(default, deserialize_with = "loose::number")]
    pub slave_delay: i64,
    #[serde(default = "default_votes", deserialize_with = "loose::number")]
    pub votes: i32,
    pub state: State,
    #[serde(default = "default_timeout", deserialize_with = "loose::number")]
    pub timeout: u32,
}

fn default_login_host() -> String {
    "localhost".to_string()
}
fn default_login_port() -> u16 {
    DEFAULT_PORT
}
fn yes() -> bool {
    true
}
fn default_priority() -> f64 {
    1.0
}
fn default_votes() -> i32 {
    1
}
fn default_timeout() -> u32 {
    60
}

impl Params {
    /// Parameters with every optional field defaulted.
    pub fn new(state: State) -> Self {
        Self {
            login_host: default_login_host(),
            login_port: default_login_port(),
            login_user: None,
            login_password: None,
            replica_set: None,
            ssl: false,
            member: None,
            arbiter_only: false,
            build_indexes: true,
            hidden: false,
            priority: default_priority(),
            slave_delay: 0,
            votes: default_votes(),
            state,
            timeout: default_timeout(),
        }
    }

    /// Read an args object. Keys the orchestration engine adds for
    /// itself (`_ansible_*`) are dropped.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut args) = value else {
            bail!(Error::InvalidParameter(
                "arguments must be a JSON object".to_string()
            ));
        };
        args.retain(|k, _| !k.starts_with("_ansible_"));
        let params = serde_json::from_value(serde_json::Value::Object(args))
            .map_err(|e| Error::InvalidParameter(e.to_string()))?;
        Ok(params)
    }

    /// Check and normalize the parameters. Nothing here touches the network.
    pub fn validate(self) -> Result<Invocation> {
        let state = self.state;
        let host = self
            .member
            .as_deref()
            .map(MemberHost::parse)
            .transpose()?;
        let replica_set = self.replica_set.filter(|name| !name.is_empty());

        match state {
            State::Initiated => ensure!(
                host.is_none() || replica_set.is_some(),
                Error::InvalidParameter(
                    "replica_set must be specified when host is specified on state=initiated"
                        .to_string()
                )
            ),
            State::Present | State::Absent => ensure!(
                host.is_some(),
                Error::InvalidParameter(format!("member must be specified on state={state}"))
            ),
        }
        ensure!(
            self.priority.is_finite() && self.priority >= 0.0,
            Error::InvalidParameter(format!("priority must be >= 0, got {}", self.priority))
        );
        ensure!(
            self.slave_delay >= 0,
            Error::InvalidParameter(format!("slave_delay must be >= 0, got {}", self.slave_delay))
        );
        ensure!(
            self.votes >= 0,
            Error::InvalidParameter(format!("votes must be >= 0, got {}", self.votes))
        );
        ensure!(
            self.timeout >= 1,
            Error::InvalidParameter("timeout must be at least 1".to_string())
        );

        let member = host.map(|host| MemberSpec {
            host,
            arbiter_only: self.arbiter_only,
            build_indexes: self.build_indexes,
            hidden: self.hidden,
            priority: self.priority,
            slave_delay: self.slave_delay,
            votes: self.votes,
        });

        let connection = ConnectionSpec {
            host: self.login_host,
            port: self.login_port,
            user: self.login_user,
            password: self.login_password,
            replica_set: replica_set.clone(),
            ssl: self.ssl,
            // An uninitiated node cannot be reached through set discovery.
            direct: state == State::Initiated || replica_set.is_none(),
        };

        Ok(Invocation {
            connection,
            target: Target {
                state,
                member,
                replica_set,
            },
            policy: PollPolicy::new(self.timeout),
        })
    }
}

/// Validated parameters, split by concern.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub connection: ConnectionSpec,
    pub target: Target,
    pub policy: PollPolicy,
}

/// Deserializers accepting the loosely typed values orchestration engines
/// pass around (`"yes"`, `"60"`, ...).
mod loose {
    use super::*;
    use serde::de::Error as _;
    use serde::Deserializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose<T> {
        Value(T),
        Text(String),
    }

    pub fn parse_bool(s: &str) -> Option<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "on" | "true" | "t" | "1" => Some(true),
            "no" | "n" | "off" | "false" | "f" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Loose::<bool>::deserialize(d)? {
            Loose::Value(b) => Ok(b),
            Loose::Text(s) => {
                parse_bool(&s).ok_or_else(|| D::Error::custom(format!("{s:?} is not a valid boolean")))
            }
        }
    }

    pub fn number<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
    {
        match Loose::<T>::deserialize(d)? {
            Loose::Value(n) => Ok(n),
            Loose::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("{s:?} is not a valid number"))),
        }
    }
}

pub use loose::parse_bool;
