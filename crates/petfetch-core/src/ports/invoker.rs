//! Child process invoker port.

use async_trait::async_trait;

use crate::domain::FetchRequest;
use crate::errors::InvokeError;

/// Everything a finished child process produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Full standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Full standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Exit code (`None` if the process was killed by a signal).
    pub exit_code: Option<i32>,
}

/// Runs one request/response cycle against the image server.
///
/// Implementations start a fresh process per call, write exactly one
/// request, and return once the process has exited. A non-zero exit must be
/// reported as [`InvokeError::ExitStatus`] carrying the stderr text.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(&self, request: &FetchRequest) -> Result<ProcessOutput, InvokeError>;
}
