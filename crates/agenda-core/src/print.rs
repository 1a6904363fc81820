//! Sending finished agendas to the local print queue.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{AgendaError, Result};

pub trait Printer {
    fn print(&self, path: &Path, copies: u32) -> Result<()>;
}

/// Prints through a CUPS-style `lp` command: `<command> -n <copies> <file>`.
#[derive(Debug, Clone)]
pub struct LpPrinter {
    command: String,
}

impl LpPrinter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Whether the print command can be found on PATH.
    pub fn available(&self) -> bool {
        which::which(&self.command).is_ok()
    }
}

impl Printer for LpPrinter {
    fn print(&self, path: &Path, copies: u32) -> Result<()> {
        let program = which::which(&self.command).map_err(|e| {
            AgendaError::Collaborator(format!("print command '{}' not found: {e}", self.command))
        })?;

        let output = Command::new(program)
            .arg("-n")
            .arg(copies.to_string())
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AgendaError::Collaborator(format!("failed to run '{}': {e}", self.command)))?;

        if !output.status.success() {
            let hint = String::from_utf8_lossy(&output.stderr)
                .chars()
                .take(500)
                .collect::<String>();
            return Err(AgendaError::Collaborator(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                hint.trim()
            )));
        }

        info!(path = %path.display(), copies, "sent to printer");
        Ok(())
    }
}
