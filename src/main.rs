//! chatspeak main entry point
//!
//! Wires configuration, the chat client and speech output together and
//! hands stdin/stdout to the conversation loop.

use chatspeak::chat::ChatClient;
use chatspeak::config::Config;
use chatspeak::conversation::Conversation;
use chatspeak::platform::{configure_wslg_audio, Platform};
use chatspeak::speech::SpeechDispatcher;
use chatspeak::Result;
use log::{debug, error, info};
use std::io;
use std::path::PathBuf;
use std::process;

const USAGE: &str = "Usage: chatspeak [--debug|-d] [--no-speech] [--config <path>]";

/// Command line options
#[derive(Debug, Default)]
struct Options {
    debug: bool,
    no_speech: bool,
    config: Option<PathBuf>,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> std::result::Result<Self, String> {
        let mut options = Options::default();
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" | "-d" => options.debug = true,
                "--no-speech" => options.no_speech = true,
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| "--config needs a path".to_string())?;
                    options.config = Some(PathBuf::from(path));
                }
                "--help" | "-h" => return Err(USAGE.to_string()),
                other => return Err(format!("Unknown argument: {}\n{}", other, USAGE)),
            }
        }
        Ok(options)
    }
}

fn main() {
    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        }
    };

    // Initialize logger
    if options.debug {
        // Debug mode: write to chatspeak.log so the chat itself stays readable
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("chatspeak.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open chatspeak.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "chatspeak version {} starting (debug mode, logging to chatspeak.log)",
            chatspeak::VERSION
        );
    } else {
        // Normal mode: RUST_LOG if set, otherwise warnings and errors on stderr
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run(&options) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(options: &Options) -> Result<()> {
    let config = match options.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!("Configuration loaded from {:?}", config.path());

    let client = ChatClient::new(&config.api_settings())?;

    let speech = if options.no_speech || !config.speech_enabled() {
        info!("Speech output disabled");
        SpeechDispatcher::disabled()
    } else {
        if Platform::current() == Platform::Wsl {
            configure_wslg_audio();
        }
        SpeechDispatcher::for_current_platform(&config.speech_settings())
    };
    debug!("Speech strategies: {:?}", speech.strategy_names());

    let mut conversation = Conversation::new(&client, &speech);
    let stdin = io::stdin();
    conversation.run(stdin.lock(), io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Options, String> {
        Options::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let options = parse(&["-d", "--no-speech", "--config", "/tmp/c.cfg"]).unwrap();
        assert!(options.debug);
        assert!(options.no_speech);
        assert_eq!(options.config, Some(PathBuf::from("/tmp/c.cfg")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--loud"]).is_err());
        assert!(parse(&[]).is_ok());
    }
}
