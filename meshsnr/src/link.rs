//! Access to the radio through the `meshtastic` command line client.
//!
//! The parsers and the scheduler only see [`RadioLink`], so they can be driven
//! by canned text in tests. [`MeshtasticCli`] is the production implementation:
//! one child process per call, bounded by a timeout and killed if it overruns.

use crate::domain::{LinkError, NodeId};
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default radio client executable.
pub const DEFAULT_PROGRAM: &str = "meshtastic";

/// Upper bound for the node table query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for one traceroute when no client-side timeout is given.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(90);

/// Extra time granted on top of the client's own `--timeout`.
const PROBE_GRACE: Duration = Duration::from_secs(30);

/// The two operations the measurement needs from the radio.
#[allow(async_fn_in_trait)]
pub trait RadioLink {
    /// Raw text of the node table.
    async fn node_table(&self) -> Result<String, LinkError>;

    /// Raw text of one traceroute towards `target`.
    async fn traceroute(&self, target: &NodeId) -> Result<String, LinkError>;
}

/// How to reach the radio.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub program: String,
    /// Serial port, e.g. `/dev/ttyUSB0` or `COM3`
    pub port: Option<String>,
    /// TCP host of a networked node
    pub host: Option<String>,
    /// Client-side traceroute timeout in seconds
    pub trace_timeout: Option<u64>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { program: DEFAULT_PROGRAM.to_string(), port: None, host: None, trace_timeout: None }
    }
}

impl LinkConfig {
    fn connection_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(port) = &self.port {
            args.extend(["--port".to_string(), port.clone()]);
        }
        if let Some(host) = &self.host {
            args.extend(["--host".to_string(), host.clone()]);
        }
        args
    }

    /// Arguments for the node table query.
    #[must_use]
    pub fn node_table_args(&self) -> Vec<String> {
        let mut args = self.connection_args();
        args.push("--nodes".to_string());
        args
    }

    /// Arguments for one traceroute.
    #[must_use]
    pub fn traceroute_args(&self, target: &NodeId) -> Vec<String> {
        let mut args = self.connection_args();
        if let Some(secs) = self.trace_timeout {
            args.extend(["--timeout".to_string(), secs.to_string()]);
        }
        args.extend(["--traceroute".to_string(), target.to_string()]);
        args
    }

    /// Wall-clock bound for one traceroute process.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        self.trace_timeout
            .map_or(DEFAULT_PROBE_TIMEOUT, |secs| Duration::from_secs(secs) + PROBE_GRACE)
    }
}

/// [`RadioLink`] backed by the `meshtastic` executable.
#[derive(Debug, Clone)]
pub struct MeshtasticCli {
    config: LinkConfig,
}

impl MeshtasticCli {
    #[must_use]
    pub fn new(config: LinkConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: Vec<String>, limit: Duration) -> Result<String, LinkError> {
        let program = self.config.program.clone();
        debug!("running {program} {}", args.join(" "));

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| LinkError::TimedOut { program: program.clone(), timeout: limit })?
            .map_err(|source| LinkError::SpawnFailed { program: program.clone(), source })?;

        if !output.status.success() {
            return Err(LinkError::ExitStatus {
                program,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("{program} output:\n{stdout}");
        Ok(stdout)
    }
}

impl RadioLink for MeshtasticCli {
    async fn node_table(&self) -> Result<String, LinkError> {
        self.run(self.config.node_table_args(), DEFAULT_QUERY_TIMEOUT).await
    }

    async fn traceroute(&self, target: &NodeId) -> Result<String, LinkError> {
        self.run(self.config.traceroute_args(target), self.config.probe_timeout()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traceroute_args_order() {
        let config = LinkConfig {
            port: Some("/dev/ttyUSB0".to_string()),
            host: None,
            trace_timeout: Some(60),
            ..LinkConfig::default()
        };
        let args = config.traceroute_args(&NodeId::from("!ba4bf9d0"));
        assert_eq!(
            args,
            vec!["--port", "/dev/ttyUSB0", "--timeout", "60", "--traceroute", "!ba4bf9d0"]
        );
    }

    #[test]
    fn test_node_table_args_with_host() {
        let config = LinkConfig { host: Some("192.168.1.20".to_string()), ..LinkConfig::default() };
        assert_eq!(config.node_table_args(), vec!["--host", "192.168.1.20", "--nodes"]);
    }

    #[test]
    fn test_probe_timeout() {
        assert_eq!(LinkConfig::default().probe_timeout(), DEFAULT_PROBE_TIMEOUT);
        let config = LinkConfig { trace_timeout: Some(120), ..LinkConfig::default() };
        assert_eq!(config.probe_timeout(), Duration::from_secs(150));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let link = MeshtasticCli::new(LinkConfig {
            program: "/nonexistent/meshtastic".to_string(),
            ..LinkConfig::default()
        });
        let err = link.node_table().await.unwrap_err();
        assert!(matches!(err, LinkError::SpawnFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        let link =
            MeshtasticCli::new(LinkConfig { program: "echo".to_string(), ..LinkConfig::default() });
        let output = link.node_table().await.unwrap();
        assert_eq!(output.trim(), "--nodes");
    }
}
