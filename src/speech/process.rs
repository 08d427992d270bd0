//! Running external speech commands
//!
//! Every command-line backend goes through a `ProcessInvoker`, which starts
//! the child, collects both output streams and waits for it to exit.
//! No timeout is applied here.

use crate::error::SpeechError;
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully resolved command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// File to connect to the child's standard input
    pub stdin_file: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            stdin_file: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn stdin_from(mut self, path: impl AsRef<Path>) -> Self {
        self.stdin_file = Some(path.as_ref().to_path_buf());
        self
    }
}

/// What a finished child process reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the child was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Exit code 0 is the only success
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Starts a command and blocks until it exits
pub trait ProcessInvoker: Send + Sync {
    /// Fails only when the program cannot be started
    fn run(&self, command: &CommandLine) -> Result<ProcessOutput, SpeechError>;
}

/// Invoker backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInvoker;

impl ProcessInvoker for SystemInvoker {
    fn run(&self, command: &CommandLine) -> Result<ProcessOutput, SpeechError> {
        debug!("Running {} {:?}", command.program, command.args);

        let launch_error = |source| SpeechError::Launch {
            program: command.program.clone(),
            source,
        };

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(ref dir) = command.working_dir {
            cmd.current_dir(dir);
        }
        match command.stdin_file {
            Some(ref path) => {
                let file = File::open(path).map_err(launch_error)?;
                cmd.stdin(Stdio::from(file));
            }
            None => {
                cmd.stdin(Stdio::null());
            }
        }

        // output() pipes stdout and stderr, drains both and reaps the child
        let output = cmd.output().map_err(launch_error)?;

        let result = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("{} exited with {:?}", command.program, result.exit_code);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_builder() {
        let cmd = CommandLine::new("espeak")
            .arg("-v")
            .args(["zh", "-f", "/tmp/x"])
            .current_dir("/");
        assert_eq!(cmd.program, "espeak");
        assert_eq!(cmd.args, vec!["-v", "zh", "-f", "/tmp/x"]);
        assert_eq!(cmd.working_dir, Some(PathBuf::from("/")));
        assert!(cmd.stdin_file.is_none());
    }

    #[test]
    fn test_launch_error_for_missing_program() {
        let cmd = CommandLine::new("chatspeak-definitely-not-a-real-program");
        match SystemInvoker.run(&cmd) {
            Err(SpeechError::Launch { program, .. }) => {
                assert_eq!(program, "chatspeak-definitely-not-a-real-program")
            }
            other => panic!("expected launch error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_exit_code_and_streams() {
        let cmd = CommandLine::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = SystemInvoker.run(&cmd).expect("sh should start");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "测试").expect("write");

        let cmd = CommandLine::new("cat").stdin_from(&path);
        let output = SystemInvoker.run(&cmd).expect("cat should start");
        assert!(output.success());
        assert_eq!(output.stdout, "测试");
    }
}
