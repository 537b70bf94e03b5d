use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidParameter(String),
    #[error("unable to connect to database: {0}")]
    ConnectionFailure(String),
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error("{message} (code={code})")]
    OperationFailure { code: i32, message: String },
    #[error("reached timeout while {0}")]
    Timeout(String),
    #[error("replica set is not initiated")]
    NotInitiated,
    #[error("malformed {what} document: {reason}")]
    MalformedDocument { what: &'static str, reason: String },
}

impl Error {
    /// Rejections the server may lift on its own, e.g. while an election is in progress.
    pub fn is_transient(e: &anyhow::Error) -> bool {
        matches!(e.downcast_ref::<Error>(), Some(Error::OperationFailure { .. }))
    }

    pub fn is_connection_lost(e: &anyhow::Error) -> bool {
        matches!(e.downcast_ref::<Error>(), Some(Error::ConnectionLost(_)))
    }
}
