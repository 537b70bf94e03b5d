use super::*;

/// How often and how long to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Number of polls before giving up. At least 1.
    pub attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    fn countdown(&self, what: &'static str) -> Countdown {
        Countdown {
            remaining: self.attempts,
            interval: self.interval,
            what,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_secs(1),
        }
    }
}

struct Countdown {
    remaining: u32,
    interval: Duration,
    what: &'static str,
}

impl Countdown {
    /// Consume one attempt. Sleeps if there is another one left.
    async fn tick(&mut self) -> Result<()> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            bail!(Error::Timeout(self.what.to_string()));
        }
        tokio::time::sleep(self.interval).await;
        Ok(())
    }
}

const STATUS_NOT_OK: &str = "waiting for rs.status() to become ok=1";

/// Poll until the connected node is a healthy primary.
pub async fn wait_for_primary(
    admin: &dyn ReplicaSetAdmin,
    policy: &PollPolicy,
) -> Result<ReplicaSetStatus> {
    let mut countdown = policy.countdown(STATUS_NOT_OK);
    loop {
        match admin.status().await {
            Ok(status) if status.is_primary_ready() => return Ok(status),
            Ok(status) => debug!("not primary yet (ok={}, myState={:?})", status.ok, status.my_state),
            Err(e) => debug!("replSetGetStatus failed: {e}"),
        }
        countdown.tick().await?;
    }
}

/// Poll until `host` is healthy and serving (secondary, primary or arbiter).
pub async fn wait_for_secondary(
    admin: &dyn ReplicaSetAdmin,
    host: &MemberHost,
    policy: &PollPolicy,
) -> Result<ReplicaSetStatus> {
    let mut countdown = policy.countdown(STATUS_NOT_OK);
    loop {
        match admin.status().await {
            Ok(status) if status.is_member_ready(host) => return Ok(status),
            Ok(status) => {
                let state = status.member(host).map(|m| (m.health, m.state));
                debug!("{host} not ready yet (ok={}, member={state:?})", status.ok);
            }
            Err(e) => debug!("replSetGetStatus failed: {e}"),
        }
        countdown.tick().await?;
    }
}

/// Poll until a mongod answers on `host`.
///
/// Registering a member that cannot be reached yet would leave it marked
/// down in the set.
pub async fn wait_for_member_alive(
    admin: &dyn ReplicaSetAdmin,
    host: &MemberHost,
    policy: &PollPolicy,
) -> Result<()> {
    let mut countdown = policy.countdown("waiting for a member to become alive");
    loop {
        match admin.probe(host).await {
            Ok(()) => return Ok(()),
            Err(e) => debug!("{host} is not alive yet: {e}"),
        }
        countdown.tick().await?;
    }
}
