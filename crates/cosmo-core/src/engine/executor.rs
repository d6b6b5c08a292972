use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// One invocation of the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Working directory holding the prepared inputs.
    pub workdir: PathBuf,
    /// Environment setup run in the same shell before the tool.
    pub prefix: Option<String>,
    pub program: String,
    pub args: Vec<String>,
}

/// Shell script run by `sh -c` when a prefix is set. The program and its
/// arguments arrive as `$0 $@`, so they are never re-split by the shell.
const PREFIXED_SCRIPT_TAIL: &str = " && \"$0\" \"$@\"";

impl ExecRequest {
    /// The command as a single shell line, prefix included, with the program
    /// and arguments quoted where needed.
    pub fn command_line(&self) -> String {
        let mut line = String::new();
        if let Some(prefix) = &self.prefix {
            line.push_str(prefix);
            line.push_str(" && ");
        }
        line.push_str(&shell_quote(&self.program));
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Abstraction over the external tool, so steps can run against scripted tools in tests.
pub trait Executor {
    /// Runs the request to completion. A non-zero exit must be reported as
    /// [`ExecutionError::Failed`].
    fn execute(&self, request: &ExecRequest) -> Result<ExecOutput, ExecutionError>;
}

/// Runs the tool as a child process, through `sh -c` when a prefix is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExecutor;

impl Executor for CommandExecutor {
    #[instrument(skip_all, fields(workdir = %request.workdir.display()))]
    fn execute(&self, request: &ExecRequest) -> Result<ExecOutput, ExecutionError> {
        let mut cmd = if let Some(prefix) = &request.prefix {
            let mut cmd = Command::new("sh");
            cmd.arg("-c")
                .arg(format!("{prefix}{PREFIXED_SCRIPT_TAIL}"))
                .arg(&request.program)
                .args(&request.args);
            cmd
        } else {
            let mut cmd = Command::new(&request.program);
            cmd.args(&request.args);
            cmd
        };
        cmd.current_dir(&request.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(command = %request.command_line(), "Spawning external tool.");
        let output = cmd.output().map_err(|e| ExecutionError::Spawn {
            program: request.program.clone(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "External tool failed.");
            return Err(ExecutionError::Failed {
                program: request.program.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("External tool completed successfully.");
        Ok(ExecOutput { stdout, stderr })
    }
}
