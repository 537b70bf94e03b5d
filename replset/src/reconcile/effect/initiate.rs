use super::*;

use crate::reconcile::plan::plan_initiate;

pub struct Effect<'a> {
    pub admin: &'a dyn ReplicaSetAdmin,
    pub policy: &'a PollPolicy,
}

impl Effect<'_> {
    /// Initiate the set unless the node already belongs to one.
    pub async fn exec(
        self,
        member: Option<&MemberSpec>,
        replica_set: Option<&str>,
    ) -> Result<Outcome> {
        let set_name = self.admin.set_name().await?;
        let config = match plan_initiate(set_name.as_deref(), member, replica_set)? {
            Plan::Initiate(config) => config,
            _ => {
                let current = self.admin.get_config().await?;
                return Ok(Outcome::unchanged(current));
            }
        };

        match &config {
            Some(config) => info!("initiate replica set {} (version {})", config.name, config.version),
            None => info!("initiate replica set with the default config"),
        }
        self.admin.initiate(config.as_ref()).await?;
        waiter::wait_for_primary(self.admin, self.policy).await?;

        let config = self.admin.get_config().await?;
        Ok(Outcome::changed(config))
    }
}
