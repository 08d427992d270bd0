//! Conversation loop tests
//!
//! Drives the loop with in-memory input and a fake chat backend.

use chatspeak::chat::{ChatBackend, ChatMessage, Role};
use chatspeak::conversation::{Conversation, REPLY_PREFIX, USER_PROMPT};
use chatspeak::speech::{SpeechDispatcher, SpeechStrategy, Utterance};
use chatspeak::{ChatSpeakError, Result, SpeechError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Backend that replays canned answers and remembers what it was sent
struct FakeBackend {
    answers: RefCell<VecDeque<Result<Vec<String>>>>,
    requests: RefCell<Vec<Vec<ChatMessage>>>,
}

impl FakeBackend {
    fn new(answers: Vec<Result<Vec<String>>>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl ChatBackend for FakeBackend {
    fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<String>> {
        self.requests.borrow_mut().push(messages.to_vec());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no more answers".into()))
    }
}

/// Strategy that records everything it is asked to say
struct Recorder(Arc<Mutex<Vec<String>>>);

impl SpeechStrategy for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn attempt(&self, utterance: &Utterance) -> std::result::Result<(), SpeechError> {
        self.0.lock().unwrap().push(utterance.to_string());
        Ok(())
    }
}

fn recording_speech() -> (SpeechDispatcher, Arc<Mutex<Vec<String>>>) {
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let dispatcher = SpeechDispatcher::new(vec![Box::new(Recorder(spoken.clone()))]);
    (dispatcher, spoken)
}

fn run(backend: &FakeBackend, speech: &SpeechDispatcher, input: &str) -> (String, usize) {
    let mut conversation = Conversation::new(backend, speech);
    let mut output = Vec::new();
    conversation
        .run(Cursor::new(input.as_bytes().to_vec()), &mut output)
        .expect("conversation");
    (
        String::from_utf8(output).expect("utf8 output"),
        conversation.transcript().len(),
    )
}

#[test]
fn test_reply_is_printed_and_spoken() {
    let backend = FakeBackend::new(vec![Ok(vec!["你好！".to_string(), "ignored".to_string()])]);
    let (speech, spoken) = recording_speech();

    let (output, turns) = run(&backend, &speech, "你好\n\n");

    assert!(output.starts_with(USER_PROMPT));
    assert!(output.contains(&format!("{}你好！\n", REPLY_PREFIX)));
    assert!(!output.contains("ignored"));
    assert_eq!(*spoken.lock().unwrap(), vec!["你好！"]);
    assert_eq!(turns, 2);
}

#[test]
fn test_transcript_grows_across_turns() {
    let backend = FakeBackend::new(vec![
        Ok(vec!["first answer".to_string()]),
        Ok(vec!["second answer".to_string()]),
    ]);
    let speech = SpeechDispatcher::disabled();

    let (_, turns) = run(&backend, &speech, "one\ntwo\n");

    let requests = backend.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].len(), 1);
    let roles: Vec<Role> = requests[1].iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    assert_eq!(requests[1][2].content, "two");
    assert_eq!(turns, 4);
}

#[test]
fn test_api_failure_is_reported_and_retracted() {
    let backend = FakeBackend::new(vec![
        Err(ChatSpeakError::Api {
            status: 401,
            body: "{\"error\":\"unauthorized\"}".to_string(),
        }),
        Ok(vec!["recovered".to_string()]),
    ]);
    let (speech, spoken) = recording_speech();

    let (output, turns) = run(&backend, &speech, "first\nsecond\n");

    assert!(output.contains("401"));
    assert!(output.contains("unauthorized"));
    let requests = backend.requests.borrow();
    let roles: Vec<Role> = requests[1].iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User]);
    assert_eq!(*spoken.lock().unwrap(), vec!["recovered"]);
    assert_eq!(turns, 2);
}

#[test]
fn test_empty_reply_list() {
    let backend = FakeBackend::new(vec![Ok(Vec::new())]);
    let (speech, spoken) = recording_speech();

    let (output, turns) = run(&backend, &speech, "anyone there?\n");

    assert!(output.contains("no message"));
    assert!(spoken.lock().unwrap().is_empty());
    assert_eq!(turns, 0);
}

#[test]
fn test_speech_failure_does_not_stop_conversation() {
    let backend = FakeBackend::new(vec![
        Ok(vec!["one".to_string()]),
        Ok(vec!["two".to_string()]),
    ]);
    let speech = SpeechDispatcher::disabled();

    let (output, turns) = run(&backend, &speech, "a\nb");

    assert!(output.contains(&format!("{}one", REPLY_PREFIX)));
    assert!(output.contains(&format!("{}two", REPLY_PREFIX)));
    assert_eq!(turns, 4);
}

#[test]
fn test_eof_ends_immediately() {
    let backend = FakeBackend::new(Vec::new());
    let speech = SpeechDispatcher::disabled();

    let (output, turns) = run(&backend, &speech, "");

    assert_eq!(output, USER_PROMPT);
    assert_eq!(turns, 0);
    assert!(backend.requests.borrow().is_empty());
}
