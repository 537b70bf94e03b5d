use super::*;

use crate::reconcile::plan::plan_remove;

pub struct Effect<'a> {
    pub admin: &'a dyn ReplicaSetAdmin,
    pub policy: &'a PollPolicy,
}

impl Effect<'_> {
    /// Remove `member` and wait for the set to settle on a primary.
    pub async fn exec(self, member: &MemberSpec) -> Result<Outcome> {
        let host = &member.host;

        // An uninitiated node has no members to remove.
        let Some(config) = self.admin.get_config().await? else {
            debug!("replica set is not initiated, {host} is not a member");
            return Ok(Outcome::unchanged(None));
        };

        let new_config = match plan_remove(member, &config) {
            Plan::Reconfigure(new_config) => new_config,
            _ => return Ok(Outcome::unchanged(Some(config))),
        };

        info!("remove {host} from {} (version {})", new_config.name, new_config.version);
        push_config(self.admin, &new_config).await?;
        waiter::wait_for_primary(self.admin, self.policy).await?;

        Ok(Outcome::changed(Some(new_config)))
    }
}
