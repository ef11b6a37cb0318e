//! Invoking the external `taskline` program.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use wait_timeout::ChildExt;

use crate::config::Config;

/// Errors from running taskline. All of them are recovered by the caller.
#[derive(Debug, Error)]
pub enum TasklineError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {}", exit_label(.code))]
    Exit { program: String, code: Option<i32> },
    #[error("{program} did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// What a submission creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Task,
    Note,
}

impl EntryKind {
    /// taskline subcommand for this kind.
    #[must_use]
    pub fn command(self) -> &'static str {
        match self {
            EntryKind::Task => "t",
            EntryKind::Note => "n",
        }
    }
}

/// A committed task or note, ready to hand to taskline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub kind: EntryKind,
    pub text: String,
    pub board: Option<String>,
}

impl Submission {
    /// Argument list passed to taskline.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.kind.command().to_string(), self.text.clone()];
        if let Some(board) = self.board.as_deref().filter(|b| !b.is_empty()) {
            args.push("-b".to_string());
            args.push(board.to_string());
        }
        args
    }
}

/// The external task tool as seen by the dashboard.
pub trait Taskline {
    /// Raw listing output, colors included.
    fn fetch_listing(&self) -> Result<String, TasklineError>;

    /// Create a task or note. Output is discarded.
    fn submit(&self, submission: &Submission) -> Result<(), TasklineError>;
}

/// Runs the real taskline binary, blocking the caller.
#[derive(Debug, Clone)]
pub struct TasklineCommand {
    program: String,
    capture_wrapper: Option<String>,
    timeout: Option<Duration>,
}

impl TasklineCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            capture_wrapper: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.program())
            .with_capture_wrapper(config.capture_wrapper())
            .with_timeout(config.timeout())
    }

    #[must_use]
    pub fn with_capture_wrapper(mut self, wrapper: Option<String>) -> Self {
        self.capture_wrapper = wrapper.filter(|w| !w.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn listing_command(&self) -> Command {
        match self.capture_wrapper.as_deref() {
            Some(wrapper) => {
                let mut cmd = Command::new(wrapper);
                cmd.arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        }
    }

    fn spawn(&self, mut cmd: Command, capture: bool) -> Result<Child, TasklineError> {
        let output = || if capture { Stdio::piped() } else { Stdio::null() };
        cmd.stdin(Stdio::null()).stdout(output()).stderr(output());
        cmd.spawn().map_err(|source| TasklineError::Spawn {
            program: cmd.get_program().to_string_lossy().into_owned(),
            source,
        })
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, TasklineError> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };
        if let Some(status) = child.wait_timeout(timeout)? {
            return Ok(status);
        }
        let _ = child.kill();
        let _ = child.wait();
        Err(TasklineError::TimedOut {
            program: self.program.clone(),
            timeout,
        })
    }

    fn check(&self, status: ExitStatus) -> Result<(), TasklineError> {
        if status.success() {
            Ok(())
        } else {
            Err(TasklineError::Exit {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

impl Taskline for TasklineCommand {
    fn fetch_listing(&self) -> Result<String, TasklineError> {
        let mut child = self.spawn(self.listing_command(), true)?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe.
        let stdout_thread = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut reader) = stdout_handle {
                let _ = reader.read_to_end(&mut buf);
            }
            buf
        });
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut reader) = stderr_handle {
                let _ = reader.read_to_end(&mut buf);
            }
            buf
        });

        let status = self.wait(&mut child)?;
        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();
        if !stderr.is_empty() {
            tracing::debug!(
                "{} stderr: {}",
                self.program,
                String::from_utf8_lossy(&stderr).trim_end()
            );
        }
        self.check(status)?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn submit(&self, submission: &Submission) -> Result<(), TasklineError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(submission.args());
        let mut child = self.spawn(cmd, false)?;
        let status = self.wait(&mut child)?;
        self.check(status)
    }
}
