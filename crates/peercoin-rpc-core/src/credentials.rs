//! Loading RPC credentials from daemon files.
//!
//! Two formats are understood:
//! - the daemon config file (`peercoin.conf`), where `rpcuser=` and
//!   `rpcpassword=` lines carry the credentials;
//! - the daemon cookie file (`.cookie`), a single `username:password` line.

use std::io;
use std::path::Path;

use crate::endpoint::Credentials;
use crate::error::CoreError;

const RPC_USER_KEY: &str = "rpcuser";
const RPC_PASSWORD_KEY: &str = "rpcpassword";

/// Read credentials from a daemon config file.
pub fn from_config_file(path: &Path) -> Result<Credentials, CoreError> {
    let content = read_credential_file(path)?;
    parse_config(&content)
}

/// Read credentials from a daemon cookie file.
pub fn from_cookie_file(path: &Path) -> Result<Credentials, CoreError> {
    let content = read_credential_file(path)?;
    parse_cookie(&content)
}

fn read_credential_file(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CoreError::FileNotFound(path.to_path_buf()),
        _ => CoreError::Io(e),
    })
}

/// Extract `rpcuser` / `rpcpassword` from config text.
///
/// Keys are matched at the start of a line (leading whitespace is ignored),
/// the first occurrence of each key wins, and the value is the rest of the
/// line with trailing whitespace removed.
pub fn parse_config(content: &str) -> Result<Credentials, CoreError> {
    let mut user = None;
    let mut password = None;

    for line in content.lines() {
        let line = line.trim_start();
        if user.is_none() {
            user = config_value(line, RPC_USER_KEY);
        }
        if password.is_none() {
            password = config_value(line, RPC_PASSWORD_KEY);
        }
        if user.is_some() && password.is_some() {
            break;
        }
    }

    match (user, password) {
        (Some(user), Some(password)) => Credentials::new(user, password),
        _ => Err(CoreError::InvalidCredentials),
    }
}

// The key must be followed directly by `=`, so `rpcpasswordhash=` does not
// count as `rpcpassword`.
fn config_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .map(str::trim_end)
}

/// Extract `username:password` from the first line of a cookie file.
pub fn parse_cookie(content: &str) -> Result<Credentials, CoreError> {
    let line = content
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or(CoreError::InvalidCredentials)?;

    let (user, password) = line
        .split_once(':')
        .ok_or(CoreError::InvalidCredentials)?;
    Credentials::new(user, password)
}
