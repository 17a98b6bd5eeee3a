use std::future::Future;
use std::path::Path;

use clap::{Args, Subcommand};
use tspeak_client::{ClientConfig, Query, ThingSpeakClient};

use crate::exit::{client_error, io_error, CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod feed;
pub mod public;
pub mod status;
pub mod update;
pub mod user;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Push field values to a channel.
    Update(UpdateArgs),
    /// Read a channel feed, or one field of it.
    Feed(FeedArgs),
    /// Read a channel's status updates.
    Status(StatusArgs),
    /// List public channels.
    Public(PublicArgs),
    /// Show a user's profile or channels.
    User(UserArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Resolved global options shared by every command.
#[derive(Debug)]
pub struct Context {
    pub config: ClientConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(
        config_path: Option<&Path>,
        server: Option<String>,
        format: OutputFormat,
    ) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|err| io_error(&format!("read {}", path.display()), err))?;
                ClientConfig::from_json(&text)
                    .map_err(|err| client_error(&format!("parse {}", path.display()), err))?
            }
            None => ClientConfig::default(),
        };
        if let Some(server) = server {
            config = config.with_server(server);
        }

        // One request per invocation; nothing to space out.
        Ok(Self {
            config: config.with_timeout_mode(false),
            format,
        })
    }

    pub fn client(&self) -> ThingSpeakClient {
        ThingSpeakClient::new(self.config.clone())
    }

    pub fn block_on<F, T>(&self, future: F) -> CliResult<T>
    where
        F: Future<Output = CliResult<T>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| CliError::new(INTERNAL, format!("failed to start runtime: {err}")))?;
        runtime.block_on(future)
    }
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Update(args) => update::run(args, ctx),
        Command::Feed(args) => feed::run(args, ctx),
        Command::Status(args) => status::run(args, ctx),
        Command::Public(args) => public::run(args, ctx),
        Command::User(args) => user::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

/// Parse a `KEY=VALUE` argument.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Parse a `N=VALUE` field argument. The range of `N` is checked later so
/// an out-of-range field exits with the usage code.
pub fn parse_field_value(raw: &str) -> Result<(u8, String), String> {
    let (field, value) = parse_pair(raw)?;
    let field = field
        .parse::<u8>()
        .map_err(|_| format!("field number must be an integer, got '{field}'"))?;
    Ok((field, value))
}

pub fn to_query(pairs: Vec<(String, String)>) -> Option<Query> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Channel id.
    pub channel: u64,
    /// Channel write key.
    #[arg(long, env = "TSPEAK_WRITE_KEY", hide_env_values = true)]
    pub write_key: String,
    /// Field value as N=VALUE (N in 1..=8). Repeatable.
    #[arg(long = "field", value_name = "N=VALUE", value_parser = parse_field_value)]
    pub fields: Vec<(u8, String)>,
    /// Status message.
    #[arg(long)]
    pub status: Option<String>,
    /// Any other update parameter as KEY=VALUE (lat, long, created_at, ...).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub extra: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Channel id.
    pub channel: u64,
    /// Read key of a private channel.
    #[arg(long, env = "TSPEAK_READ_KEY", hide_env_values = true)]
    pub read_key: Option<String>,
    /// Read only this field (1..=8).
    #[arg(long)]
    pub field: Option<u8>,
    /// Read only the last entry.
    #[arg(long)]
    pub last: bool,
    /// Query parameter as KEY=VALUE. Repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Channel id.
    pub channel: u64,
    /// Read key of a private channel.
    #[arg(long, env = "TSPEAK_READ_KEY", hide_env_values = true)]
    pub read_key: Option<String>,
    /// Query parameter as KEY=VALUE. Repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct PublicArgs {
    /// Query parameter as KEY=VALUE. Repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct UserArgs {
    /// User name.
    pub name: String,
    /// List the user's channels instead of the profile.
    #[arg(long)]
    pub channels: bool,
    /// Query parameter as KEY=VALUE. Repeatable.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show build details.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_splits_on_first_equals() {
        assert_eq!(
            parse_pair("created_at=2024-01-01T00:00:00Z").unwrap(),
            ("created_at".to_string(), "2024-01-01T00:00:00Z".to_string())
        );
        assert_eq!(
            parse_pair("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn field_value_needs_numeric_field() {
        assert_eq!(parse_field_value("3=on").unwrap(), (3, "on".to_string()));
        assert_eq!(parse_field_value("0=1").unwrap(), (0, "1".to_string()));
        assert!(parse_field_value("x=1").is_err());
    }

    #[test]
    fn empty_pairs_mean_no_query() {
        assert_eq!(to_query(Vec::new()), None);
        let query = to_query(vec![("results".to_string(), "2".to_string())]).unwrap();
        assert_eq!(query["results"], "2");
    }

    #[test]
    fn server_flag_overrides_default_and_disables_throttling() {
        let ctx = Context::load(None, Some("http://localhost:3000/".to_string()), OutputFormat::Json)
            .unwrap();
        assert_eq!(ctx.config.base_url(), "http://localhost:3000");
        assert!(!ctx.config.use_timeout_mode);
    }
}
