use super::*;

use replset::params::{parse_bool, Password, State};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "replset",
    version,
    about = "Initiate a MongoDB replica set and add or remove its members"
)]
pub struct Cli {
    /// JSON object with the parameters, as written by the orchestration
    /// engine. Flags are ignored when it is given.
    #[arg(value_name = "ARGS_FILE")]
    args_file: Option<PathBuf>,

    #[arg(long, default_value = "localhost")]
    login_host: String,
    #[arg(long, default_value_t = replset::DEFAULT_PORT)]
    login_port: u16,
    #[arg(long, env = "MONGODB_LOGIN_USER")]
    login_user: Option<String>,
    #[arg(long, env = "MONGODB_LOGIN_PASSWORD", hide_env_values = true)]
    login_password: Option<String>,

    /// Required to initiate with an explicit --member.
    #[arg(long)]
    replica_set: Option<String>,
    #[arg(long)]
    ssl: bool,

    #[arg(long, value_name = "HOST[:PORT]")]
    member: Option<String>,
    #[arg(long)]
    arbiter_only: bool,
    #[arg(long, value_name = "BOOL", default_value = "yes", value_parser = bool_arg, action = ArgAction::Set)]
    build_indexes: bool,
    #[arg(long)]
    hidden: bool,
    #[arg(long, default_value_t = 1.0)]
    priority: f64,
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    slave_delay: i64,
    #[arg(long, default_value_t = 1)]
    votes: i32,

    #[arg(long, value_name = "initiated|present|absent", required_unless_present = "args_file")]
    state: Option<State>,
    /// Polls (one per second) before giving up on the set.
    #[arg(long, default_value_t = 60)]
    timeout: u32,
}

fn bool_arg(s: &str) -> std::result::Result<bool, String> {
    parse_bool(s).ok_or_else(|| format!("{s:?} is not a boolean"))
}

impl Cli {
    pub fn into_params(self) -> Result<Params> {
        if let Some(path) = &self.args_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            return Params::from_json(value);
        }

        let state = self.state.context("--state is required")?;
        Ok(Params {
            login_host: self.login_host,
            login_port: self.login_port,
            login_user: self.login_user,
            login_password: self.login_password.map(Password::new),
            replica_set: self.replica_set,
            ssl: self.ssl,
            member: self.member,
            arbiter_only: self.arbiter_only,
            build_indexes: self.build_indexes,
            hidden: self.hidden,
            priority: self.priority,
            slave_delay: self.slave_delay,
            votes: self.votes,
            state,
            timeout: self.timeout,
        })
    }
}
