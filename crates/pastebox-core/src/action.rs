//! The fixed local action performed when the sentinel command arrives.
//!
//! The poller never runs the command text itself; the only thing it can do
//! is ask the system who the current user is.

use crate::error::ActionError;
use std::process::{Command, Stdio};

/// Something the poller runs once per accepted command.
pub trait LocalAction {
    /// Short name for log lines.
    fn name(&self) -> &str;

    /// Run the action and return its textual output.
    fn execute(&self) -> Result<String, ActionError>;
}

impl<T: LocalAction + ?Sized> LocalAction for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&self) -> Result<String, ActionError> {
        (**self).execute()
    }
}

/// Runs the platform's identity query (`whoami`) and returns its stdout.
#[derive(Debug, Clone)]
pub struct IdentityQuery {
    program: String,
}

impl Default for IdentityQuery {
    fn default() -> Self {
        Self {
            program: "whoami".to_string(),
        }
    }
}

impl IdentityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable. Only meant for tests and unusual PATH layouts.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl LocalAction for IdentityQuery {
    fn name(&self) -> &str {
        &self.program
    }

    fn execute(&self) -> Result<String, ActionError> {
        let path = which::which(&self.program)
            .map_err(|_| ActionError::NotFound(self.program.clone()))?;

        let output = Command::new(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ActionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(ActionError::Failed {
                program: self.program.clone(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
