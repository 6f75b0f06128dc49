use std::sync::mpsc::{channel, Receiver, Sender};

/// Events a recognizer delivers to the game, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    Started,
    /// The accumulated transcript for the current capture so far
    Result(String),
    Error(RecognizerErrorKind),
    /// Capture ended; may arrive without a clean stop
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerErrorKind {
    /// Silence while the child prepares to speak; never user-visible
    NoSpeech,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    AlreadyStarted,
}

/// Narrow capture contract the game drives. Events are pulled with `poll`
/// from the same single-threaded loop that handles keys and ticks.
pub trait SpeechRecognizer {
    fn start(&mut self) -> Result<(), StartError>;
    fn stop(&mut self);
    /// Drain events produced since the last poll
    fn poll(&mut self) -> Vec<RecognizerEvent>;
}

/// Fire-and-forget pronunciation playback. The game paces transitions with
/// fixed delays, never with synthesis completion.
pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str, locale: &str);
}

/// Synthesizer for hosts without audio output.
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn speak(&mut self, _text: &str, _locale: &str) {}
}

/// Recording synthesizer for tests.
#[derive(Default)]
pub struct RecordingSynthesizer {
    pub spoken: Vec<String>,
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&mut self, text: &str, locale: &str) {
        self.spoken.push(format!("{locale}:{text}"));
    }
}

/// Production recognizer: the parent echoes the child's spoken attempt on
/// the keyboard and commits it with a newline. Each committed utterance is
/// appended to the capture's accumulated transcript and emitted as one
/// `Result`, so one commit equals one graded listening cycle.
pub struct TypedRecognizer {
    rx: Receiver<char>,
    capturing: bool,
    transcript: String,
    draft: String,
    pending: Vec<RecognizerEvent>,
}

impl TypedRecognizer {
    pub fn new() -> (Self, Sender<char>) {
        let (tx, rx) = channel();
        (
            Self {
                rx,
                capturing: false,
                transcript: String::new(),
                draft: String::new(),
                pending: Vec::new(),
            },
            tx,
        )
    }
}

impl SpeechRecognizer for TypedRecognizer {
    fn start(&mut self) -> Result<(), StartError> {
        if self.capturing {
            return Err(StartError::AlreadyStarted);
        }
        self.capturing = true;
        self.transcript.clear();
        self.draft.clear();
        self.pending.push(RecognizerEvent::Started);
        Ok(())
    }

    fn stop(&mut self) {
        if self.capturing {
            self.capturing = false;
            self.pending.push(RecognizerEvent::Ended);
        }
    }

    fn poll(&mut self) -> Vec<RecognizerEvent> {
        while let Ok(c) = self.rx.try_recv() {
            if !self.capturing {
                continue;
            }
            if c == '\n' {
                if !self.draft.is_empty() {
                    if !self.transcript.is_empty() {
                        self.transcript.push(' ');
                    }
                    self.transcript.push_str(&self.draft);
                    self.draft.clear();
                    self.pending
                        .push(RecognizerEvent::Result(self.transcript.clone()));
                }
            } else {
                self.draft.push(c);
            }
        }
        std::mem::take(&mut self.pending)
    }
}

/// Test recognizer driven by a scripted event sequence. The test keeps the
/// sender and pushes whatever interleaving it wants to exercise; `poll`
/// relays events verbatim, so ordering edge cases (late `Ended`, duplicate
/// results) stay under test control.
pub struct ScriptedRecognizer {
    rx: Receiver<RecognizerEvent>,
    capturing: bool,
    pub start_calls: usize,
    pub stop_calls: usize,
}

impl ScriptedRecognizer {
    pub fn new() -> (Self, Sender<RecognizerEvent>) {
        let (tx, rx) = channel();
        (
            Self {
                rx,
                capturing: false,
                start_calls: 0,
                stop_calls: 0,
            },
            tx,
        )
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<(), StartError> {
        self.start_calls += 1;
        if self.capturing {
            return Err(StartError::AlreadyStarted);
        }
        self.capturing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
        self.capturing = false;
    }

    fn poll(&mut self) -> Vec<RecognizerEvent> {
        self.rx.try_iter().collect()
    }
}
