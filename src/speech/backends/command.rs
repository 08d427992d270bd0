//! Command-line speech tools
//!
//! Covers every backend that is "run this program on a file":
//! - `spd-say` (Speech Dispatcher client, follows the desktop's accessibility settings)
//! - `espeak` (plain synthesizer, fallback when Speech Dispatcher is missing)
//! - `say` (macOS)
//!
//! Each attempt probes for the program, writes the utterance to a scratch
//! file, runs the program on it and succeeds only on exit code 0.

use crate::error::SpeechError;
use crate::speech::probe::CommandProber;
use crate::speech::process::{CommandLine, ProcessInvoker};
use crate::speech::scratch::ScratchArea;
use crate::speech::{SpeechStrategy, Utterance};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Replaced by the language code in argument templates
pub const LANG_PLACEHOLDER: &str = "{lang}";
/// Replaced by the scratch file path in argument templates
pub const FILE_PLACEHOLDER: &str = "{file}";

/// How the scratch file reaches the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    /// The path appears in the arguments through `{file}`
    PathArgument,
    /// The file is connected to standard input
    Stdin,
}

/// Speaks by running one external program
pub struct CommandStrategy {
    program: String,
    args: Vec<String>,
    language: String,
    input: TextInput,
    working_dir: PathBuf,
    prober: Arc<dyn CommandProber>,
    invoker: Arc<dyn ProcessInvoker>,
    scratch: ScratchArea,
}

impl CommandStrategy {
    pub fn new(
        program: impl Into<String>,
        args: &[&str],
        language: impl Into<String>,
        input: TextInput,
        prober: Arc<dyn CommandProber>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        let program = program.into();
        let scratch = ScratchArea::new(format!("{}-", program));
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
            language: language.into(),
            input,
            working_dir: default_working_dir(),
            prober,
            invoker,
            scratch,
        }
    }

    /// `spd-say -w -e -l <lang>`, text on stdin
    ///
    /// spd-say has no file option; `-e` reads standard input and `-w`
    /// waits until the message has been spoken.
    pub fn spd_say(
        language: &str,
        prober: Arc<dyn CommandProber>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        Self::new(
            "spd-say",
            &["-w", "-e", "-l", LANG_PLACEHOLDER],
            language,
            TextInput::Stdin,
            prober,
            invoker,
        )
    }

    /// `espeak -v <lang> -f <file>`
    pub fn espeak(
        language: &str,
        prober: Arc<dyn CommandProber>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        Self::new(
            "espeak",
            &["-v", LANG_PLACEHOLDER, "-f", FILE_PLACEHOLDER],
            language,
            TextInput::PathArgument,
            prober,
            invoker,
        )
    }

    /// `say -f <file>` on macOS, which picks its own voice
    pub fn say(prober: Arc<dyn CommandProber>, invoker: Arc<dyn ProcessInvoker>) -> Self {
        Self::new(
            "say",
            &["-f", FILE_PLACEHOLDER],
            "",
            TextInput::PathArgument,
            prober,
            invoker,
        )
    }

    /// Put scratch files somewhere other than the OS temp directory
    pub fn with_scratch(mut self, scratch: ScratchArea) -> Self {
        self.scratch = scratch;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Fill in the argument template for one scratch file
    fn command_line(&self, file: &Path) -> CommandLine {
        let file_arg = file.to_string_lossy();
        let args = self.args.iter().map(|arg| {
            arg.replace(LANG_PLACEHOLDER, &self.language)
                .replace(FILE_PLACEHOLDER, &file_arg)
        });

        let cmd = CommandLine::new(self.program.clone())
            .args(args)
            .current_dir(&self.working_dir);
        match self.input {
            TextInput::Stdin => cmd.stdin_from(file),
            TextInput::PathArgument => cmd,
        }
    }
}

impl SpeechStrategy for CommandStrategy {
    fn name(&self) -> &str {
        &self.program
    }

    fn attempt(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        if !self.prober.is_available(&self.program) {
            return Err(SpeechError::CommandUnavailable(self.program.clone()));
        }

        let output = self
            .scratch
            .with_file(utterance.as_str(), |path| {
                self.invoker.run(&self.command_line(path))
            })??;

        if !output.success() {
            return Err(SpeechError::NonZeroExit {
                program: self.program.clone(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let stdout = output.stdout.trim();
        if !stdout.is_empty() {
            debug!("{} output: {}", self.program, stdout);
        }
        Ok(())
    }
}

/// Speech tools do not care where they run; the filesystem root always exists
fn default_working_dir() -> PathBuf {
    if cfg!(windows) {
        std::env::temp_dir()
    } else {
        PathBuf::from("/")
    }
}
