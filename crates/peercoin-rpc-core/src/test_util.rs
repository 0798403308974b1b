//! Shared test helpers for `peercoin-rpc-core` unit tests.
//!
//! Consolidates temp-file handling for credential files and canned JSON-RPC
//! reply builders so tests across modules share one source of dummy data.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

// ==============================================================================
// Temp Files
// ==============================================================================

static NEXT_FILE: AtomicU64 = AtomicU64::new(0);

/// A file under the system temp dir, removed on drop.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn with_contents(name: &str, contents: &str) -> Self {
        let path = Self::unused_path(name);
        fs::write(&path, contents).expect("temp file must be writable");
        Self { path }
    }

    /// A path in the temp dir that no test has written to.
    pub fn unused_path(name: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time must be after unix epoch")
            .as_nanos();
        let seq = NEXT_FILE.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("peercoin-rpc-core-{unique}-{seq}-{name}"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

// ==============================================================================
// Canned Replies
// ==============================================================================

/// A successful single-call reply body in the daemon's 1.1 dialect.
pub fn single_reply(result: Value) -> String {
    json!({"result": result, "error": null, "id": null}).to_string()
}

/// A successful batch reply body, one item per result, ids in order.
pub fn batch_reply(results: &[Value]) -> String {
    let items: Vec<Value> = results
        .iter()
        .enumerate()
        .map(|(id, result)| json!({"result": result, "error": null, "id": id}))
        .collect();
    Value::Array(items).to_string()
}
