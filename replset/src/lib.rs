#![deny(unused_must_use)]

mod error;
pub use error::Error;

/// Member specification and `host:port` normalization.
pub mod member;

/// Replica set configuration document.
pub mod config;

/// Replica set status document.
pub mod status;

/// Administrative commands against a live deployment.
pub mod admin;

/// Invocation parameters.
pub mod params;

/// Deciding and applying the membership change.
pub mod reconcile;

/// Polling the deployment until it converges.
pub mod waiter;

/// Structured result handed back to the caller.
pub mod report;

pub use mongodb::bson;

use anyhow::{bail, ensure, Context, Result};
use bson::{doc, Document};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use admin::ReplicaSetAdmin;
use config::{MemberConfig, ReplicaSetConfig};
use member::{MemberHost, MemberSpec};
use status::ReplicaSetStatus;
use waiter::PollPolicy;

/// Port a member listens on when none is given.
pub const DEFAULT_PORT: u16 = 27017;
