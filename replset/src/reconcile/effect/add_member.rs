use super::*;

use crate::reconcile::plan::plan_add;

pub struct Effect<'a> {
    pub admin: &'a dyn ReplicaSetAdmin,
    pub policy: &'a PollPolicy,
}

impl Effect<'_> {
    /// Add `member` and wait until it serves.
    ///
    /// A rejected reconfiguration (e.g. an election is in progress) is retried
    /// against a freshly read config until the budget runs out.
    pub async fn exec(self, member: &MemberSpec) -> Result<Outcome> {
        let host = &member.host;
        let mut budget = self.policy.attempts;
        let mut attempted = false;

        loop {
            let config = self
                .admin
                .get_config()
                .await?
                .ok_or(Error::NotInitiated)?;

            let new_config = match plan_add(member, &config) {
                Plan::Reconfigure(new_config) => new_config,
                _ => {
                    if attempted {
                        info!("{host} is in the config after an earlier attempt");
                    }
                    return Ok(Outcome {
                        changed: attempted,
                        config: Some(config),
                    });
                }
            };

            waiter::wait_for_member_alive(self.admin, host, self.policy).await?;

            info!("add {host} to {} (version {})", new_config.name, new_config.version);
            attempted = true;
            match push_config(self.admin, &new_config).await {
                Ok(()) => {
                    waiter::wait_for_secondary(self.admin, host, self.policy).await?;
                    return Ok(Outcome::changed(Some(new_config)));
                }
                Err(e) if Error::is_transient(&e) => {
                    budget -= 1;
                    if budget == 0 {
                        bail!(Error::Timeout(format!("trying to add a member: {e}")));
                    }
                    warn!("failed to add {host}, {budget} attempts left: {e}");
                    tokio::time::sleep(self.policy.interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
