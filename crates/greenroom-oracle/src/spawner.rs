use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, trace};

use crate::{OracleConfig, OracleError};

/// Output captured from one oracle process run
#[derive(Debug, Clone)]
pub struct OracleOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: std::time::Duration,
}

impl OracleOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Utility for spawning oracle processes
pub struct ProcessSpawner;

impl ProcessSpawner {
    /// Spawn a process, capture its output, and enforce the configured timeout
    pub async fn spawn(
        binary: &Path,
        args: &[&str],
        config: &OracleConfig,
    ) -> Result<OracleOutput, OracleError> {
        let start = Instant::now();

        debug!(
            binary = %binary.display(),
            args_len = args.len(),
            timeout = ?config.timeout,
            "Spawning oracle process"
        );

        let mut cmd = Command::new(binary);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null()) // Non-interactive
            .kill_on_drop(true); // Reaps the process if the timeout cancels the capture

        for (key, value) in &config.env_vars {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn()?;

        let stdout_handle = child.stdout.take().expect("stdout not captured");
        let stderr_handle = child.stderr.take().expect("stderr not captured");

        let capture = async {
            let mut stdout_reader = BufReader::new(stdout_handle).lines();
            let mut stderr_reader = BufReader::new(stderr_handle).lines();

            let mut stdout = String::new();
            let mut stderr = String::new();

            loop {
                tokio::select! {
                    biased;

                    result = stdout_reader.next_line() => {
                        match result {
                            Ok(Some(line)) => {
                                trace!(line = %line, "stdout");
                                if !stdout.is_empty() {
                                    stdout.push('\n');
                                }
                                stdout.push_str(&line);
                            }
                            Ok(None) => {
                                // stdout closed, drain stderr then stop
                                while let Ok(Some(line)) = stderr_reader.next_line().await {
                                    trace!(line = %line, "stderr");
                                    if !stderr.is_empty() {
                                        stderr.push('\n');
                                    }
                                    stderr.push_str(&line);
                                }
                                break;
                            }
                            Err(e) => {
                                return Err(OracleError::CallFailed(format!(
                                    "Failed to read stdout: {}",
                                    e
                                )));
                            }
                        }
                    }
                    result = stderr_reader.next_line() => {
                        match result {
                            Ok(Some(line)) => {
                                trace!(line = %line, "stderr");
                                if !stderr.is_empty() {
                                    stderr.push('\n');
                                }
                                stderr.push_str(&line);
                            }
                            Ok(None) => {
                                // stderr closed, keep reading stdout
                            }
                            Err(e) => {
                                return Err(OracleError::CallFailed(format!(
                                    "Failed to read stderr: {}",
                                    e
                                )));
                            }
                        }
                    }
                }
            }

            let status = child.wait().await?;
            Ok((stdout, stderr, status.code().unwrap_or(-1)))
        };

        let (stdout, stderr, exit_code) = match config.timeout {
            Some(limit) => match tokio::time::timeout(limit, capture).await {
                Ok(result) => result?,
                Err(_) => {
                    debug!(?limit, "Oracle process timed out");
                    return Err(OracleError::Timeout(limit));
                }
            },
            None => capture.await?,
        };

        let duration = start.elapsed();

        debug!(
            exit_code,
            duration_ms = duration.as_millis(),
            "Oracle process completed"
        );

        Ok(OracleOutput {
            stdout,
            stderr,
            exit_code,
            duration,
        })
    }
}
