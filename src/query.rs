use std::{process::Stdio, sync::Arc};

use async_trait::async_trait;
use tokio::{process::Command, time::timeout};

use crate::config::BrowseConfig;
use crate::error::{BrowseError, Result};

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&c| c as char).collect()
}

/// Paths in a build graph are bytes; decode them as UTF-8 when we can.  Each
/// line stands on its own, so one non-UTF-8 path falls back to Latin-1 without
/// mangling the UTF-8 names around it.
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            let bytes = err.into_bytes();
            bytes
                .split(|&b| b == b'\n')
                .map(|line| match std::str::from_utf8(line) {
                    Ok(s) => s.to_string(),
                    Err(_) => latin1_to_string(line),
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Source of `-t query` output.  The router only talks to this trait so the
/// real subprocess can be swapped out.
#[async_trait]
pub trait GraphQuery {
    /// Return the full query block describing `target`.  Implementations must
    /// never hand back output from an invocation that failed.
    async fn query(&self, target: &str) -> Result<String>;
}

pub type SharedQuery = Arc<dyn GraphQuery + Send + Sync>;

/// Runs the configured ninja binary once per query.
pub struct NinjaQuery {
    config: Arc<BrowseConfig>,
}

impl NinjaQuery {
    pub fn new(config: Arc<BrowseConfig>) -> NinjaQuery {
        NinjaQuery { config }
    }
}

/// Ninja reports a node it doesn't know either as `<target> unknown` on
/// stdout or as `ninja: error: unknown target '<target>'` on stderr,
/// depending on the version.
fn is_unknown_target(target: &str, stdout: &str, stderr: &str) -> bool {
    stdout.trim() == format!("{} unknown", target) || stderr.contains("unknown target")
}

#[async_trait]
impl GraphQuery for NinjaQuery {
    async fn query(&self, target: &str) -> Result<String> {
        let tool = &self.config.tool;
        let mut command = Command::new(tool);
        command
            .args(self.config.query_args(target))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(tool = %tool.display(), node = target, "running query");

        let output = match self.config.query_timeout {
            Some(limit) => match timeout(limit, command.output()).await {
                Ok(output) => output,
                Err(_) => {
                    return Err(BrowseError::query_failure(
                        target,
                        format!("no answer after {} seconds", limit.as_secs_f64()),
                    ));
                }
            },
            None => command.output().await,
        }
        .map_err(|err| {
            BrowseError::query_failure(target, format!("could not run {}: {}", tool.display(), err))
        })?;

        let stdout = decode_bytes(output.stdout);
        if !output.status.success() {
            let stderr = decode_bytes(output.stderr);
            if is_unknown_target(target, &stdout, &stderr) {
                return Err(BrowseError::UnknownTarget(target.to_string()));
            }
            let detail = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            return Err(BrowseError::query_failure(
                target,
                format!("{} exited with {}: {}", tool.display(), output.status, detail),
            ));
        }

        if stdout.trim().is_empty() {
            return Err(BrowseError::query_failure(
                target,
                format!("{} printed nothing", tool.display()),
            ));
        }

        Ok(stdout)
    }
}
