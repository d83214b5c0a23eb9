//! Child process invoker.
//!
//! Spawns the image server, writes one request line to its stdin, closes
//! stdin, and collects stdout and stderr until the process exits. The
//! server is not kept alive between requests.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use petfetch_core::{FetchRequest, InvokeError, ProcessInvoker, ProcessOutput};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::debug;

/// Runs the image server once per request.
#[derive(Debug, Clone)]
pub struct ChildProcessInvoker {
    command: PathBuf,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl ChildProcessInvoker {
    /// Invoker for `command`, started with no arguments.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
            env: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    #[must_use]
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Kill the child if it has not exited after `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    async fn run(&self, line: String) -> Result<ProcessOutput, InvokeError> {
        let mut cmd = Command::new(&self.command);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| InvokeError::Spawn {
            path: self.command.clone(),
            source,
        })?;
        debug!(pid = ?child.id(), command = %self.command.display(), "Spawned image server");

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| InvokeError::Io(io::Error::other("child stdin unavailable")))?;

        // Write concurrently with draining stdout/stderr so a chatty child
        // can never fill its pipes while we are still writing.
        let (written, output) = tokio::join!(write_request(stdin, line), child.wait_with_output());
        let output = output?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        if !output.status.success() {
            return Err(InvokeError::ExitStatus {
                code: exit_code,
                stderr,
            });
        }

        match written {
            Ok(()) => {}
            // The child answered without reading its input; its output still counts.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("Image server closed stdin before reading the request");
            }
            Err(e) => return Err(InvokeError::Io(e)),
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "Image server diagnostics");
        }

        Ok(ProcessOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

async fn write_request(mut stdin: ChildStdin, line: String) -> io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.shutdown().await?;
    drop(stdin);
    Ok(())
}

#[async_trait]
impl ProcessInvoker for ChildProcessInvoker {
    async fn invoke(&self, request: &FetchRequest) -> Result<ProcessOutput, InvokeError> {
        let line = request.to_line()?;
        debug!(id = request.id, method = %request.method, kind = %request.params.kind, "Invoking image server");

        match self.timeout {
            // Dropping the timed-out future drops the child, which kills it.
            Some(limit) => tokio::time::timeout(limit, self.run(line))
                .await
                .map_err(|_| InvokeError::Timeout(limit))?,
            None => self.run(line).await,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use petfetch_core::PetKind;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn request() -> FetchRequest {
        FetchRequest::new(1, "get_pet_image", PetKind::Cat)
    }

    #[tokio::test]
    async fn test_request_is_written_as_one_line() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "echo.sh", "cat");

        let output = ChildProcessInvoker::new(path)
            .invoke(&request())
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout, request().to_line().unwrap());
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_are_collected() {
        let dir = TempDir::new().unwrap();
        let path = script(
            &dir,
            "both.sh",
            "read line\necho 'warming up' >&2\necho '{\"imageUrl\":\"http://example/x.jpg\"}'",
        );

        let output = ChildProcessInvoker::new(path)
            .invoke(&request())
            .await
            .unwrap();

        assert_eq!(output.stdout, "{\"imageUrl\":\"http://example/x.jpg\"}\n");
        assert_eq!(output.stderr, "warming up\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = script(
            &dir,
            "fail.sh",
            "read line\nprintf 'no images for axolotl\\n  try cat\\n' >&2\nexit 3",
        );

        let err = ChildProcessInvoker::new(path)
            .invoke(&request())
            .await
            .unwrap_err();

        match err {
            InvokeError::ExitStatus { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "no images for axolotl\n  try cat\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let err = ChildProcessInvoker::new(dir.path().join("does-not-exist"))
            .invoke(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_env_and_working_dir_are_applied() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "env.sh", "echo \"$PET_FLAVOR $(pwd)\"");

        let output = ChildProcessInvoker::new(path)
            .with_env(vec![("PET_FLAVOR".to_string(), "fluffy".to_string())])
            .with_working_dir(Some(dir.path().to_path_buf()))
            .invoke(&request())
            .await
            .unwrap();

        assert!(output.stdout.starts_with("fluffy "));
        let reported = PathBuf::from(output.stdout.trim().trim_start_matches("fluffy "));
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_timeout_kills_hung_child() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "hang.sh", "sleep 30");

        let err = ChildProcessInvoker::new(path)
            .with_timeout(Some(Duration::from_millis(200)))
            .invoke(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Timeout(_)));
    }
}
