use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{bail, eyre, Result, WrapErr};
use serde_json::Value;

/// Send JSON-RPC calls to a Peercoin daemon.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Daemon host name or IP address.
    #[arg(long, default_value = "127.0.0.1", env = "PEERCOIN_RPC_HOST")]
    pub host: String,

    /// Daemon RPC port (defaults to 9902, or 9904 with --testnet).
    #[arg(long, env = "PEERCOIN_RPC_PORT")]
    pub port: Option<u16>,

    /// Talk to a testnet daemon.
    #[arg(
        long,
        env = "PEERCOIN_RPC_TESTNET",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub testnet: bool,

    /// RPC username. Must be given together with --rpc-password.
    #[arg(long, env = "PEERCOIN_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password. Must be given together with --rpc-user.
    #[arg(long, env = "PEERCOIN_RPC_PASSWORD", hide_env_values = true)]
    pub rpc_password: Option<String>,

    /// Daemon config file to read `rpcuser` / `rpcpassword` from.
    #[arg(long, env = "PEERCOIN_RPC_CONF")]
    pub conf: Option<PathBuf>,

    /// Daemon cookie file (`username:password`).
    #[arg(long, env = "PEERCOIN_RPC_COOKIE")]
    pub cookie: Option<PathBuf>,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Print only the `result` members instead of the full JSON-RPC replies.
    #[arg(long)]
    pub results: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a single RPC call.
    Call {
        /// RPC method name, e.g. `getblockcount`.
        method: String,
        /// Positional params. Each is parsed as JSON, falling back to a string.
        params: Vec<String>,
    },
    /// Send several calls as one JSON-RPC batch.
    ///
    /// Each CALL is one shell word: either `method param...` separated by
    /// whitespace, or a JSON array such as `["sendmany", {"PAddr": 1.0}]`.
    Batch {
        #[arg(required = true)]
        calls: Vec<String>,
    },
    /// List the built-in method catalog with parameters and defaults.
    Methods,
}

/// A call parsed from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgs {
    pub method: String,
    pub params: Vec<Value>,
}

impl Command {
    /// The calls to queue, in order. Empty for `methods`.
    pub fn calls(&self) -> Result<Vec<CallArgs>> {
        match self {
            Command::Call { method, params } => Ok(vec![CallArgs {
                method: method.clone(),
                params: params.iter().map(String::as_str).map(parse_param).collect(),
            }]),
            Command::Batch { calls } => calls
                .iter()
                .map(|call| parse_batch_call(call).wrap_err_with(|| format!("batch call `{call}`")))
                .collect(),
            Command::Methods => Ok(Vec::new()),
        }
    }
}

/// Parse a CLI param as JSON, or keep it as a string when it is not JSON
/// (addresses, account names, hex blobs).
pub fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn parse_batch_call(raw: &str) -> Result<CallArgs> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let items: Vec<Value> =
            serde_json::from_str(trimmed).wrap_err("batch call is not a JSON array")?;
        let mut items = items.into_iter();
        let method = match items.next() {
            Some(Value::String(method)) => method,
            _ => bail!("first element must be the method name"),
        };
        return Ok(CallArgs {
            method,
            params: items.collect(),
        });
    }

    let mut words = trimmed.split_whitespace();
    let method = words.next().ok_or_else(|| eyre!("empty call"))?;
    Ok(CallArgs {
        method: method.to_owned(),
        params: words.map(parse_param).collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    // Tests that read or set PEERCOIN_RPC_TESTNET hold this lock.
    static TESTNET_ENV: Mutex<()> = Mutex::new(());

    #[test]
    fn call_subcommand_parses_params_as_json_or_string() {
        let _env = TESTNET_ENV.lock().unwrap_or_else(|e| e.into_inner());
        let cli = Cli::try_parse_from([
            "peercoin-rpc",
            "--rpc-user",
            "alice",
            "--rpc-password",
            "secret",
            "call",
            "sendtoaddress",
            "PAddr1",
            "1.5",
        ])
        .expect("args must parse");
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, None);
        assert!(!cli.testnet);

        let calls = cli.command.calls().expect("calls must parse");
        assert_eq!(
            calls,
            vec![CallArgs {
                method: "sendtoaddress".to_owned(),
                params: vec![json!("PAddr1"), json!(1.5)],
            }]
        );
    }

    #[test]
    fn batch_subcommand_accepts_words_and_json_arrays() {
        let cli = Cli::try_parse_from([
            "peercoin-rpc",
            "--testnet",
            "--port",
            "19904",
            "batch",
            "getinfo",
            "getblockhash 10",
            r#"["sendmany", {"PAddr1": 1.0}, "", "rent"]"#,
        ])
        .expect("args must parse");
        assert!(cli.testnet);
        assert_eq!(cli.port, Some(19904));

        let calls = cli.command.calls().expect("calls must parse");
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].method, "getinfo");
        assert!(calls[0].params.is_empty());
        assert_eq!(calls[1].params, vec![json!(10)]);
        assert_eq!(calls[2].method, "sendmany");
        assert_eq!(
            calls[2].params,
            vec![json!({"PAddr1": 1.0}), json!(""), json!("rent")]
        );
    }

    #[test]
    fn testnet_env_accepts_boolish_values() {
        let _env = TESTNET_ENV.lock().unwrap_or_else(|e| e.into_inner());
        for (value, expected) in [("1", true), ("yes", true), ("0", false), ("off", false)] {
            std::env::set_var("PEERCOIN_RPC_TESTNET", value);
            let parsed = Cli::try_parse_from(["peercoin-rpc", "methods"]);
            std::env::remove_var("PEERCOIN_RPC_TESTNET");
            let cli = parsed.unwrap_or_else(|e| panic!("PEERCOIN_RPC_TESTNET={value}: {e}"));
            assert_eq!(cli.testnet, expected, "PEERCOIN_RPC_TESTNET={value}");
        }
    }

    #[test]
    fn batch_requires_at_least_one_call() {
        assert!(Cli::try_parse_from(["peercoin-rpc", "batch"]).is_err());
    }

    #[test]
    fn batch_rejects_malformed_calls() {
        assert!(parse_batch_call("   ").is_err());
        assert!(parse_batch_call("[1, 2]").is_err());
        assert!(parse_batch_call("[\"getinfo\"").is_err());
    }

    #[test]
    fn parse_param_keeps_non_json_as_string() {
        assert_eq!(parse_param("true"), json!(true));
        assert_eq!(parse_param("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_param("PXyZ123"), json!("PXyZ123"));
    }
}
