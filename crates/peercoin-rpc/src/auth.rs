use std::path::{Path, PathBuf};

use eyre::{bail, Result, WrapErr};
use peercoin_rpc_core::{RpcClient, Transport};

/// Where the RPC credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit { user: String, password: String },
    ConfigFile(PathBuf),
    CookieFile(PathBuf),
}

/// Pick the credential source from CLI flags.
///
/// Precedence:
/// 1. explicit `--rpc-user` + `--rpc-password`
/// 2. `--conf` daemon config file
/// 3. `--cookie` daemon cookie file
pub fn resolve(
    user: Option<&str>,
    password: Option<&str>,
    conf: Option<&Path>,
    cookie: Option<&Path>,
) -> Result<CredentialSource> {
    match (user, password) {
        (Some(user), Some(password)) => {
            return Ok(CredentialSource::Explicit {
                user: user.to_owned(),
                password: password.to_owned(),
            })
        }
        (Some(_), None) | (None, Some(_)) => {
            bail!("--rpc-user and --rpc-password must be set together")
        }
        (None, None) => {}
    }

    if let Some(conf) = conf {
        return Ok(CredentialSource::ConfigFile(conf.to_path_buf()));
    }
    if let Some(cookie) = cookie {
        return Ok(CredentialSource::CookieFile(cookie.to_path_buf()));
    }

    bail!("no RPC credentials: pass --rpc-user/--rpc-password, --conf or --cookie")
}

pub fn authenticate<T: Transport>(
    client: &mut RpcClient<T>,
    source: &CredentialSource,
) -> Result<()> {
    match source {
        CredentialSource::Explicit { user, password } => client
            .authenticate(user, password)
            .wrap_err("authenticate with --rpc-user/--rpc-password"),
        CredentialSource::ConfigFile(path) => client
            .authenticate_from_file(path)
            .wrap_err_with(|| format!("read credentials from {}", path.display())),
        CredentialSource::CookieFile(path) => client
            .authenticate_from_cookie(path)
            .wrap_err_with(|| format!("read cookie from {}", path.display())),
    }
}
