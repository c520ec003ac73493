//! Helpers shared by the modules that drive external tools.

use std::path::Path;
use std::process::{ExitStatus, Output};
use tracing::debug;

/// Exit status and decoded output streams of a finished process.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Logs both streams under the tool name.
    ///
    /// Tools like lame and flac report progress on stderr, so a non-empty
    /// stderr is not an error by itself.
    pub fn log(&self, tool: &str) {
        if !self.stdout.trim().is_empty() {
            debug!("{} stdout: {}", tool, self.stdout.trim_end());
        }
        if !self.stderr.trim().is_empty() {
            debug!("{} stderr: {}", tool, self.stderr.trim_end());
        }
    }

    /// Returns stderr when it has content.
    pub fn stderr_text(&self) -> Option<String> {
        non_empty(&self.stderr)
    }
}

impl From<Output> for Captured {
    fn from(output: Output) -> Self {
        Self {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Returns the trimmed text, or `None` if it is blank.
pub(crate) fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Renders a command line for logging.
pub(crate) fn command_line(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(char::is_whitespace) {
            line.push('\'');
            line.push_str(arg);
            line.push('\'');
        } else {
            line.push_str(arg);
        }
    }
    line
}
