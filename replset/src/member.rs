use super::*;

use derive_more::Display;
use std::str::FromStr;

/// Identity of a member: always `host:port`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display("{addr}")]
pub struct MemberHost {
    addr: String,
    port: u16,
}

impl MemberHost {
    /// Parse `host` or `host:port`. A missing port becomes `DEFAULT_PORT`.
    /// IPv6 literals must be bracketed (`[::1]` or `[::1]:27018`).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        ensure!(
            !s.is_empty(),
            Error::InvalidParameter("member host must not be empty".to_string())
        );

        let (host, port) = split_host_port(s)?;
        ensure!(
            !host.is_empty() && host != "[]",
            Error::InvalidParameter(format!("member host is missing in {s:?}"))
        );
        let port = match port {
            None => DEFAULT_PORT,
            Some(p) => p.parse::<u16>().map_err(|_| {
                Error::InvalidParameter(format!("invalid port {p:?} in member {s:?}"))
            })?,
        };

        Ok(Self {
            addr: format!("{host}:{port}"),
            port,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.addr
    }

    /// Host part, brackets included for IPv6 literals.
    pub fn hostname(&self) -> &str {
        let n = self.addr.len() - self.port.to_string().len() - 1;
        &self.addr[..n]
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for MemberHost {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq<str> for MemberHost {
    fn eq(&self, other: &str) -> bool {
        self.addr == other
    }
}

fn split_host_port(s: &str) -> Result<(&str, Option<&str>)> {
    if s.starts_with('[') {
        let close = s.find(']').ok_or_else(|| {
            Error::InvalidParameter(format!("unterminated IPv6 literal in {s:?}"))
        })?;
        let (host, tail) = s.split_at(close + 1);
        let port = match tail {
            "" => None,
            _ => Some(tail.strip_prefix(':').ok_or_else(|| {
                Error::InvalidParameter(format!("unexpected {tail:?} after IPv6 literal"))
            })?),
        };
        return Ok((host, port));
    }

    ensure!(
        s.matches(':').count() <= 1,
        Error::InvalidParameter(format!("IPv6 literal must be bracketed in {s:?}"))
    );
    match s.rsplit_once(':') {
        Some((host, port)) => Ok((host, Some(port))),
        None => Ok((s, None)),
    }
}

/// Member to be added to (or removed from) a replica set.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberSpec {
    pub host: MemberHost,
    pub arbiter_only: bool,
    pub build_indexes: bool,
    pub hidden: bool,
    pub priority: f64,
    pub slave_delay: i64,
    pub votes: i32,
}

impl MemberSpec {
    /// Member with the server's default tuning.
    pub fn new(host: MemberHost) -> Self {
        Self {
            host,
            arbiter_only: false,
            build_indexes: true,
            hidden: false,
            priority: 1.0,
            slave_delay: 0,
            votes: 1,
        }
    }

    /// Entry for the `members` array of a config document.
    /// Only the fields that differ from the server defaults are written.
    pub fn to_config(&self, id: i32) -> MemberConfig {
        let mut out = MemberConfig::new(id, self.host.as_str());
        if self.arbiter_only {
            out.arbiter_only = Some(true);
        }
        if !self.build_indexes {
            out.build_indexes = Some(false);
        }
        if self.hidden {
            out.hidden = Some(true);
        }
        if self.priority != 1.0 {
            out.priority = Some(self.priority);
        }
        if self.slave_delay != 0 {
            out.slave_delay = Some(self.slave_delay);
        }
        if self.votes != 1 {
            out.votes = Some(self.votes);
        }
        out
    }
}
