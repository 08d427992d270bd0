//! The conversation loop
//!
//! Reads one line at a time, sends the transcript to the chat backend,
//! prints the reply and reads it aloud before prompting again.

use crate::chat::{ChatBackend, ChatMessage, Transcript};
use crate::speech::{DispatchOutcome, SpeechDispatcher};
use crate::{ChatSpeakError, Result};
use log::{debug, error, info};
use std::io::{BufRead, Write};

pub const USER_PROMPT: &str = "User: ";
pub const REPLY_PREFIX: &str = "AI: ";

/// A chat session: transcript, backend and speech output
pub struct Conversation<'a> {
    backend: &'a dyn ChatBackend,
    speech: &'a SpeechDispatcher,
    transcript: Transcript,
}

impl<'a> Conversation<'a> {
    pub fn new(backend: &'a dyn ChatBackend, speech: &'a SpeechDispatcher) -> Self {
        Self {
            backend,
            speech,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run until end of input or an empty line
    ///
    /// Only I/O errors on `input`/`output` end the loop with an error;
    /// API and speech failures are reported and the loop continues.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        loop {
            write!(output, "{}", USER_PROMPT)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                debug!("End of input");
                break;
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                debug!("Empty line, ending conversation");
                break;
            }

            self.turn(line, &mut output)?;
        }

        info!("Conversation ended after {} messages", self.transcript.len());
        Ok(())
    }

    /// One user turn: ask, print, speak
    pub fn turn<W: Write>(&mut self, text: &str, output: &mut W) -> Result<()> {
        self.transcript.push(ChatMessage::user(text));

        match self.backend.complete(self.transcript.messages()) {
            Ok(replies) => match replies.into_iter().next() {
                Some(reply) => {
                    writeln!(output, "{}{}", REPLY_PREFIX, reply)?;
                    output.flush()?;
                    self.transcript.push(ChatMessage::assistant(reply.clone()));
                    self.speak(&reply);
                }
                None => {
                    writeln!(output, "The AI returned no message.")?;
                    self.transcript.retract_user_turn();
                }
            },
            Err(ChatSpeakError::Api { status, body }) => {
                error!("Chat request failed with status {}", status);
                writeln!(output, "Request failed, status code: {}", status)?;
                writeln!(output, "Response body: {}", body)?;
                self.transcript.retract_user_turn();
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                writeln!(output, "Request failed: {}", e)?;
                self.transcript.retract_user_turn();
            }
        }

        Ok(())
    }

    /// Read the reply aloud; the outcome only matters for logging
    fn speak(&self, reply: &str) {
        match self.speech.speak(reply) {
            DispatchOutcome::Spoken { strategy } => debug!("Reply spoken with {}", strategy),
            DispatchOutcome::Skipped => debug!("Reply was blank, nothing spoken"),
            DispatchOutcome::Unavailable => debug!("Reply not spoken"),
        }
    }
}
