mod auth;
mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};

use peercoin_rpc_core::rpc::methods::METHODS;
use peercoin_rpc_core::{CoreError, HttpTransport, Network, RpcClient};

fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    if let cli::Command::Methods = args.command {
        for spec in METHODS {
            println!("{}", spec.usage());
        }
        return Ok(());
    }

    let calls = args.command.calls()?;
    let source = auth::resolve(
        args.rpc_user.as_deref(),
        args.rpc_password.as_deref(),
        args.conf.as_deref(),
        args.cookie.as_deref(),
    )?;

    let network = if args.testnet {
        Network::Testnet
    } else {
        Network::Mainnet
    };
    let transport = HttpTransport::with_timeout(Duration::from_secs(args.timeout_secs))
        .context("build HTTP transport")?;
    let mut client = RpcClient::with_transport(&args.host, args.port, network, transport);
    auth::authenticate(&mut client, &source)?;

    for call in calls {
        client.call_named(&call.method, call.params)?;
    }

    tracing::debug!(
        host = client.host(),
        port = client.port(),
        calls = client.pending_len(),
        "sending request"
    );
    let target = format!("{}:{}", client.host(), client.port());
    let response = client.execute().map_err(|err| {
        let message = format_rpc_error(&target, &err);
        eyre!(message).wrap_err("while sending the request to the Peercoin daemon")
    })?;

    let output = if !args.results {
        response.into_value()
    } else if response.is_batch() {
        serde_json::Value::Array(response.into_results()?)
    } else {
        response.into_result()?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn format_rpc_error(target: &str, err: &CoreError) -> String {
    let source_error = err.to_string();
    let mut lines = vec![
        format!("RPC request to `{target}` failed"),
        format!("RPC error: {source_error}"),
    ];

    if err.is_decode() {
        lines.push(
            "hint: the reply was not JSON; an empty body usually means the daemon rejected \
             the credentials (HTTP 401)"
                .into(),
        );
    } else if source_error.contains("dns error") {
        lines.push(
            "hint: hostname resolution failed; verify --host and your DNS/network".into(),
        );
    } else if source_error.contains("timed out") {
        lines.push("hint: the daemon did not answer in time; try a larger --timeout-secs".into());
    } else if err.is_transport() {
        lines.push(
            "hint: request could not be sent; verify the daemon is running with server=1 \
             and listening on the RPC port"
                .into(),
        );
    }

    lines.join("\n")
}
