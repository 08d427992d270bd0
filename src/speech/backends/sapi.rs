//! Windows SAPI backend for WSL
//!
//! Under WSL the Linux side often has no working audio, but the Windows
//! synthesizer is reachable through `powershell.exe`. The utterance goes into
//! a scratch file, `wslpath -w` turns its path into one Windows can open, and
//! a one-shot PowerShell script reads it and speaks it with
//! System.Speech.Synthesis, using the same locale preference as the native
//! backend.

use crate::error::SpeechError;
use crate::speech::probe::CommandProber;
use crate::speech::process::{CommandLine, ProcessInvoker, ProcessOutput};
use crate::speech::scratch::ScratchArea;
use crate::speech::{SpeechStrategy, Utterance};
use log::debug;
use std::path::Path;
use std::sync::Arc;

const POWERSHELL: &str = "powershell.exe";
const WSLPATH: &str = "wslpath";

/// Exit code the script uses when neither locale has a voice
const NO_VOICE_EXIT: i32 = 3;

/// Windows SAPI through PowerShell interop
pub struct SapiStrategy {
    preferred_locale: String,
    fallback_locale: String,
    prober: Arc<dyn CommandProber>,
    invoker: Arc<dyn ProcessInvoker>,
    scratch: ScratchArea,
}

impl SapiStrategy {
    pub fn new(
        preferred_locale: impl Into<String>,
        fallback_locale: impl Into<String>,
        prober: Arc<dyn CommandProber>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        Self {
            preferred_locale: preferred_locale.into(),
            fallback_locale: fallback_locale.into(),
            prober,
            invoker,
            scratch: ScratchArea::new("sapi-"),
        }
    }

    pub fn with_scratch(mut self, scratch: ScratchArea) -> Self {
        self.scratch = scratch;
        self
    }

    /// Ask WSL for the Windows form of a Linux path
    fn windows_path(&self, path: &Path) -> Result<String, SpeechError> {
        let cmd = CommandLine::new(WSLPATH).arg("-w").arg(path.to_string_lossy());
        let output = self.invoker.run(&cmd)?;
        if !output.success() {
            return Err(SpeechError::NonZeroExit {
                program: WSLPATH.to_string(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }

    fn speak_file(&self, path: &Path) -> Result<ProcessOutput, SpeechError> {
        let windows_path = self.windows_path(path)?;
        debug!("Scratch file visible to Windows as {}", windows_path);
        let cmd = CommandLine::new(POWERSHELL)
            .args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(self.script(&windows_path));
        self.invoker.run(&cmd)
    }

    /// PowerShell script that speaks the file at `windows_path`
    fn script(&self, windows_path: &str) -> String {
        format!(
            r#"
Add-Type -AssemblyName System.Speech
$synth = New-Object System.Speech.Synthesis.SpeechSynthesizer
$voices = $synth.GetInstalledVoices() | ForEach-Object {{ $_.VoiceInfo }}
$voice = $voices | Where-Object {{ $_.Culture.Name -eq {preferred} }} | Select-Object -First 1
if (-not $voice) {{
    $voice = $voices | Where-Object {{ $_.Culture.Name -eq {fallback} }} | Select-Object -First 1
}}
if (-not $voice) {{
    [Console]::Error.WriteLine('no installed voice for ' + {preferred} + ' or ' + {fallback})
    exit {no_voice}
}}
$synth.SelectVoice($voice.Name)
$synth.SetOutputToDefaultAudioDevice()
$synth.Speak([System.IO.File]::ReadAllText({path}, [System.Text.Encoding]::UTF8))
"#,
            preferred = quote(&self.preferred_locale),
            fallback = quote(&self.fallback_locale),
            no_voice = NO_VOICE_EXIT,
            path = quote(windows_path),
        )
    }
}

/// Single-quoted PowerShell string literal
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl SpeechStrategy for SapiStrategy {
    fn name(&self) -> &str {
        "windows sapi"
    }

    fn attempt(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        if !self.prober.is_available(POWERSHELL) {
            return Err(SpeechError::CommandUnavailable(POWERSHELL.to_string()));
        }

        let output = self
            .scratch
            .with_file(utterance.as_str(), |path| self.speak_file(path))??;

        match output.exit_code {
            Some(0) => Ok(()),
            Some(NO_VOICE_EXIT) => Err(SpeechError::VoiceUnavailable(format!(
                "'{}' or '{}'",
                self.preferred_locale, self.fallback_locale
            ))),
            code => Err(SpeechError::NonZeroExit {
                program: POWERSHELL.to_string(),
                code,
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }
}
