use super::*;

use crate::params::Password;
use bson::Bson;
use mongodb::error::{Error as DriverError, ErrorKind};
use mongodb::options::{ClientOptions, Credential, ServerAddress, Tls, TlsOptions};
use mongodb::Client;

const APP_NAME: &str = "replset";
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// `NotYetInitialized`
const NOT_YET_INITIALIZED: i32 = 94;

/// Where and how to open the session.
#[derive(Clone, Debug)]
pub struct ConnectionSpec {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<Password>,
    pub replica_set: Option<String>,
    pub ssl: bool,
    /// Talk to `host:port` only instead of discovering the set.
    pub direct: bool,
}

impl ConnectionSpec {
    fn client_options(&self) -> ClientOptions {
        let address = ServerAddress::Tcp {
            host: self.host.clone(),
            port: Some(self.port),
        };
        let mut options = ClientOptions::builder().hosts(vec![address]).build();
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        if self.direct {
            options.direct_connection = Some(true);
        } else {
            options.repl_set_name = self.replica_set.clone();
        }
        if self.ssl {
            options.tls = Some(Tls::Enabled(TlsOptions::default()));
        }
        options
    }

    fn credential(&self) -> Option<Credential> {
        let (user, password) = (self.user.as_ref()?, self.password.as_ref()?);
        let credential = Credential::builder()
            .username(user.clone())
            .password(password.expose().to_string())
            .source("admin".to_string())
            .build();
        Some(credential)
    }
}

/// `ReplicaSetAdmin` backed by the MongoDB driver.
pub struct MongoAdmin {
    client: Client,
    tls: bool,
}

impl MongoAdmin {
    /// Open a session and make sure the node answers.
    ///
    /// Failing to authenticate is not fatal: the session falls back to an
    /// unauthenticated connection, which is enough on a node that has no
    /// users yet.
    pub async fn connect(spec: &ConnectionSpec) -> Result<Self> {
        let mut options = spec.client_options();

        if let Some(credential) = spec.credential() {
            options.credential = Some(credential);
            let client = Client::with_options(options.clone()).map_err(connection_failure)?;
            match ping(&client).await {
                Ok(()) => return Ok(Self::new(client, spec)),
                Err(e) if is_auth_error(&e) => {
                    warn!("authentication failed, continuing unauthenticated: {e}");
                    options.credential = None;
                }
                Err(e) => return Err(connection_failure(e)),
            }
        }

        let client = Client::with_options(options).map_err(connection_failure)?;
        ping(&client).await.map_err(connection_failure)?;
        Ok(Self::new(client, spec))
    }

    fn new(client: Client, spec: &ConnectionSpec) -> Self {
        info!("connected to {}:{}", spec.host, spec.port);
        Self {
            client,
            tls: spec.ssl,
        }
    }

    async fn command(&self, command: Document) -> Result<Document> {
        self.client
            .database("admin")
            .run_command(command)
            .await
            .map_err(classify)
    }
}

#[async_trait::async_trait]
impl ReplicaSetAdmin for MongoAdmin {
    async fn set_name(&self) -> Result<Option<String>> {
        let reply = self.command(doc! { "isMaster": 1 }).await?;
        Ok(reply.get_str("setName").ok().map(str::to_owned))
    }

    async fn get_config(&self) -> Result<Option<ReplicaSetConfig>> {
        let mut reply = match self.command(doc! { "replSetGetConfig": 1 }).await {
            Ok(reply) => reply,
            Err(e) => match e.downcast_ref::<Error>() {
                Some(Error::OperationFailure {
                    code: NOT_YET_INITIALIZED,
                    ..
                }) => return Ok(None),
                _ => return Err(e),
            },
        };
        let Some(Bson::Document(config)) = reply.remove("config") else {
            bail!(Error::MalformedDocument {
                what: "replSetGetConfig reply",
                reason: "no config".to_string(),
            });
        };
        let config = ReplicaSetConfig::from_document(config)?;
        Ok(Some(config))
    }

    async fn initiate(&self, config: Option<&ReplicaSetConfig>) -> Result<()> {
        let arg = match config {
            Some(config) => Bson::Document(config.to_document()?),
            None => Bson::Int32(1),
        };
        self.command(doc! { "replSetInitiate": arg }).await?;
        Ok(())
    }

    async fn reconfigure(&self, config: &ReplicaSetConfig) -> Result<()> {
        let mut config = config.to_document()?;
        // The server owns the term.
        config.remove("term");
        self.command(doc! { "replSetReconfig": config }).await?;
        Ok(())
    }

    async fn status(&self) -> Result<ReplicaSetStatus> {
        match self.command(doc! { "replSetGetStatus": 1 }).await {
            Ok(reply) => ReplicaSetStatus::from_document(reply),
            // An error reply is a status too: the set is not ok yet.
            Err(e) if Error::is_transient(&e) => {
                debug!("replSetGetStatus: {e}");
                Ok(ReplicaSetStatus::unavailable())
            }
            Err(e) => Err(e),
        }
    }

    async fn probe(&self, host: &MemberHost) -> Result<()> {
        let address = ServerAddress::Tcp {
            host: host.hostname().trim_matches(&['[', ']'][..]).to_string(),
            port: Some(host.port()),
        };
        let mut options = ClientOptions::builder().hosts(vec![address]).build();
        options.app_name = Some(APP_NAME.to_string());
        options.direct_connection = Some(true);
        options.connect_timeout = Some(PROBE_TIMEOUT);
        options.server_selection_timeout = Some(PROBE_TIMEOUT);
        if self.tls {
            options.tls = Some(Tls::Enabled(TlsOptions::default()));
        }

        let client = Client::with_options(options).map_err(connection_failure)?;
        let res = ping(&client).await;
        client.shutdown().await;
        res.map_err(connection_failure)
    }
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(())
}

fn is_auth_error(e: &DriverError) -> bool {
    matches!(&*e.kind, ErrorKind::Authentication { .. })
}

fn connection_failure(e: DriverError) -> anyhow::Error {
    Error::ConnectionFailure(e.to_string()).into()
}

/// Map a driver error onto the classes the reconciler acts on.
fn classify(e: DriverError) -> anyhow::Error {
    match &*e.kind {
        ErrorKind::Command(failure) => Error::OperationFailure {
            code: failure.code,
            message: failure.message.clone(),
        }
        .into(),
        ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
            Error::ConnectionLost(e.to_string()).into()
        }
        // No server was picked, so the command was never sent.
        ErrorKind::ServerSelection { .. } => Error::ConnectionFailure(e.to_string()).into(),
        _ => anyhow::Error::new(e),
    }
}
