//! Checking whether a speech command is installed

use crate::error::SpeechError;
use log::debug;
use std::process::{Command, Stdio};

/// Answers "can this executable be invoked?"
pub trait CommandProber: Send + Sync {
    /// Never fails: any lookup error means "not available"
    fn is_available(&self, command: &str) -> bool;
}

/// Resolves commands through the OS path lookup tool
///
/// Spawns `which` (or `where` on Windows) once per query. Nothing is cached.
#[derive(Debug, Clone)]
pub struct PathProber {
    lookup: &'static str,
}

impl PathProber {
    pub fn new() -> Self {
        let lookup = if cfg!(windows) { "where" } else { "which" };
        Self { lookup }
    }

    fn lookup(&self, command: &str) -> Result<bool, SpeechError> {
        let status = Command::new(self.lookup)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| SpeechError::Probe {
                command: command.to_string(),
                reason: format!("could not run {}: {}", self.lookup, e),
            })?;
        Ok(status.success())
    }
}

impl Default for PathProber {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandProber for PathProber {
    fn is_available(&self, command: &str) -> bool {
        match self.lookup(command) {
            Ok(found) => {
                debug!("{} {}: {}", self.lookup, command, if found { "found" } else { "not found" });
                found
            }
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }
}
