//! Platform detection utilities

use log::{debug, info};
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

/// PulseAudio socket exposed by WSLg
const WSLG_PULSE_PATH: &str = "/mnt/wslg/PulseServer";

/// Operating environment, as far as speech output is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    /// Linux running under Windows Subsystem for Linux
    Wsl,
    /// Other Unix-like systems with the usual command-line speech tools
    Unix,
    Unsupported,
}

static CURRENT: Lazy<Platform> = Lazy::new(|| {
    let platform = Platform::from_os(std::env::consts::OS, is_wsl());
    debug!("Detected platform: {:?}", platform);
    platform
});

impl Platform {
    /// Platform of the running process, detected once
    pub fn current() -> Platform {
        *CURRENT
    }

    /// Map an OS name (as in `std::env::consts::OS`) to a platform
    pub fn from_os(os: &str, wsl: bool) -> Platform {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" if wsl => Platform::Wsl,
            "linux" => Platform::Linux,
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Platform::Unix,
            _ => Platform::Unsupported,
        }
    }
}

/// Detect if running in WSL (Windows Subsystem for Linux)
///
/// Checks for WSL-specific indicators in /proc/version and environment variables.
pub fn is_wsl() -> bool {
    if let Ok(contents) = fs::read_to_string("/proc/version") {
        let lower = contents.to_lowercase();
        if lower.contains("microsoft") || lower.contains("wsl") {
            return true;
        }
    }

    std::env::var("WSL_DISTRO_NAME").is_ok()
}

/// Point Linux audio clients at the WSLg PulseAudio server
///
/// Child processes inherit `PULSE_SERVER`, which lets espeak and
/// speech-dispatcher reach the Windows audio device. An existing setting is
/// left alone. Call before any other threads are started.
pub fn configure_wslg_audio() {
    if std::env::var_os("PULSE_SERVER").is_some() {
        debug!("PULSE_SERVER already set via environment");
        return;
    }

    if Path::new(WSLG_PULSE_PATH).exists() {
        info!("Auto-detected WSLg PulseAudio server at {}", WSLG_PULSE_PATH);
        std::env::set_var("PULSE_SERVER", WSLG_PULSE_PATH);
    } else {
        debug!("No WSLg PulseAudio server at {}", WSLG_PULSE_PATH);
    }
}
