use super::*;

mod mongo;
pub use mongo::{ConnectionSpec, MongoAdmin};

/// Administrative commands the reconciler needs from a deployment.
///
/// Implementations report server-side rejections as `Error::OperationFailure`
/// and dropped connections as `Error::ConnectionLost` so that callers can
/// tell transient conditions apart.
#[async_trait::async_trait]
pub trait ReplicaSetAdmin: Sync + Send {
    /// Name of the replica set the connected node belongs to (`isMaster.setName`).
    async fn set_name(&self) -> Result<Option<String>>;

    /// Current config. `None` if the set was never initiated.
    async fn get_config(&self) -> Result<Option<ReplicaSetConfig>>;

    /// `replSetInitiate`. Without a config the server builds a single-node one.
    async fn initiate(&self, config: Option<&ReplicaSetConfig>) -> Result<()>;

    /// `replSetReconfig`.
    async fn reconfigure(&self, config: &ReplicaSetConfig) -> Result<()>;

    /// `replSetGetStatus`.
    async fn status(&self) -> Result<ReplicaSetStatus>;

    /// Succeeds if a mongod is listening on `host` and answers a ping.
    async fn probe(&self, host: &MemberHost) -> Result<()>;
}
