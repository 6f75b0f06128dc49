use crate::celebration::CelebrationAnimation;
use crate::matcher;
use crate::session::AttemptResult;
use crate::speech::{RecognizerErrorKind, RecognizerEvent, SpeechRecognizer, SpeechSynthesizer};
use crate::TICK_RATE_MS;

pub const LOCALE: &str = "cs-CZ";

pub const SUCCESS_ADVANCE_MS: u64 = 2000;
pub const SKIP_ADVANCE_MS: u64 = 1000;
pub const ERROR_CLEAR_MS: u64 = 2000;

/// Visual state of the active word
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Feedback {
    Idle,
    Listening,
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Advance,
    ClearError,
}

/// One-shot delayed transition, counted down by ticks. Carries the word
/// generation it was scheduled for: a countdown that outlives its word
/// fires as a no-op instead of mutating the next word's state.
#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: PendingKind,
    remaining_ms: u64,
    generation: u64,
}

/// Drives one word at a time through listening and grading, accumulating
/// one `AttemptResult` per word. All transitions happen on recognizer
/// events, user actions, or ticks; nothing blocks.
pub struct Game {
    words: Vec<String>,
    uppercase_only: bool,
    index: usize,
    feedback: Feedback,
    attempts: u32,
    elapsed_ms: u64,
    last_heard: String,
    /// One-shot outcome guard, reset only on word activation
    resolved: bool,
    generation: u64,
    pending: Option<Pending>,
    results: Vec<AttemptResult>,
    complete: bool,
    viewport: (u16, u16),
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    pub celebration: CelebrationAnimation,
}

impl Game {
    pub fn new(
        words: Vec<String>,
        uppercase_only: bool,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        let complete = words.is_empty();
        Self {
            words,
            uppercase_only,
            index: 0,
            feedback: Feedback::Idle,
            attempts: 0,
            elapsed_ms: 0,
            last_heard: String::new(),
            resolved: false,
            generation: 0,
            pending: None,
            results: Vec::new(),
            complete,
            viewport: (80, 24),
            recognizer,
            synthesizer,
            celebration: CelebrationAnimation::new(),
        }
    }

    pub fn current_word(&self) -> &str {
        &self.words[self.index]
    }

    /// The word as shown to the child
    pub fn display_word(&self) -> String {
        if self.uppercase_only {
            self.current_word().to_uppercase()
        } else {
            self.current_word().to_string()
        }
    }

    /// (1-based position, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.index + 1, self.words.len())
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_heard(&self) -> &str {
        &self.last_heard
    }

    pub fn results(&self) -> &[AttemptResult] {
        &self.results
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Hosts without a recognizer get a blocking notice instead of a game
    pub fn speech_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    /// User action: begin or end a listening cycle.
    pub fn toggle_listening(&mut self) {
        if self.complete || self.resolved || !self.speech_supported() {
            return;
        }

        if self.feedback == Feedback::Listening {
            self.stop_recognizer();
            self.feedback = Feedback::Idle;
        } else {
            // Tolerate a recognizer that is already capturing; Listening is
            // entered on its Started event
            if let Some(recognizer) = self.recognizer.as_mut() {
                let _ = recognizer.start();
            }
        }
    }

    /// User action: give up on this word. The correct pronunciation is
    /// played and the word resolves as a failure after a short delay.
    pub fn skip(&mut self) {
        if self.complete || self.resolved {
            return;
        }

        self.stop_recognizer();
        self.feedback = Feedback::Processing;

        let word = self.current_word().to_string();
        self.synthesizer.speak(&word, LOCALE);

        self.resolved = true;
        self.push_result(false, self.attempts);
        self.schedule(PendingKind::Advance, SKIP_ADVANCE_MS);
    }

    /// Leave the session: stop capture and invalidate any pending delayed
    /// transition. No result is recorded for an unresolved word; the caller
    /// drops the whole game, results included.
    pub fn exit(&mut self) {
        self.stop_recognizer();
        self.generation += 1;
        self.pending = None;
    }

    pub fn on_recognizer_event(&mut self, event: RecognizerEvent) {
        if self.complete {
            return;
        }

        match event {
            RecognizerEvent::Started => {
                if !self.resolved {
                    self.feedback = Feedback::Listening;
                }
            }
            RecognizerEvent::Result(transcript) => self.on_transcript(&transcript),
            RecognizerEvent::Error(RecognizerErrorKind::NoSpeech) => {
                // silence is expected while the child gathers courage
            }
            RecognizerEvent::Error(_) => {
                if !self.resolved {
                    self.feedback = Feedback::Error;
                    self.schedule(PendingKind::ClearError, ERROR_CLEAR_MS);
                }
            }
            RecognizerEvent::Ended => {
                // capture can end for any reason; fall back to idle unless
                // the word already resolved or an error is on display
                if !self.resolved && self.feedback != Feedback::Error {
                    self.feedback = Feedback::Idle;
                }
            }
        }
    }

    /// Grade an accumulated transcript against the active word. A miss
    /// closes one listening cycle (the attempt counter moves) but never
    /// records an outcome; only a match or an explicit skip does that.
    fn on_transcript(&mut self, transcript: &str) {
        if self.resolved {
            return;
        }

        self.last_heard = transcript.to_string();
        self.feedback = Feedback::Processing;

        if matcher::matches(transcript, self.current_word()) {
            self.succeed();
        } else {
            self.attempts += 1;
            self.feedback = Feedback::Listening;
        }
    }

    fn succeed(&mut self) {
        self.resolved = true;
        self.stop_recognizer();
        self.feedback = Feedback::Success;

        self.push_result(true, self.attempts + 1);

        let (width, height) = self.viewport;
        self.celebration.start(width, height);

        let praise = format!("Výborně! {}", self.current_word());
        self.synthesizer.speak(&praise, LOCALE);

        self.schedule(PendingKind::Advance, SUCCESS_ADVANCE_MS);
    }

    /// Advance time: accumulate listening duration, run the celebration,
    /// drain recognizer events, and count down the pending transition.
    pub fn on_tick(&mut self) {
        if self.complete {
            return;
        }

        let events = match self.recognizer.as_mut() {
            Some(recognizer) => recognizer.poll(),
            None => Vec::new(),
        };
        for event in events {
            self.on_recognizer_event(event);
        }

        if self.feedback == Feedback::Listening {
            self.elapsed_ms += TICK_RATE_MS;
        }

        self.celebration.update(TICK_RATE_MS as f64 / 1000.0);

        if let Some(pending) = self.pending.as_mut() {
            pending.remaining_ms = pending.remaining_ms.saturating_sub(TICK_RATE_MS);
            if pending.remaining_ms == 0 {
                let fired = self.pending.take().unwrap();
                if fired.generation == self.generation {
                    match fired.kind {
                        PendingKind::Advance => self.advance(),
                        PendingKind::ClearError => {
                            if !self.resolved {
                                self.feedback = Feedback::Idle;
                            }
                        }
                    }
                }
            }
        }
    }

    fn schedule(&mut self, kind: PendingKind, delay_ms: u64) {
        self.pending = Some(Pending {
            kind,
            remaining_ms: delay_ms,
            generation: self.generation,
        });
    }

    fn push_result(&mut self, success: bool, attempts: u32) {
        let reading_time = (self.elapsed_ms + 500) / 1000;
        self.results.push(AttemptResult {
            word: self.current_word().to_string(),
            success,
            attempts,
            reading_time,
        });
    }

    fn advance(&mut self) {
        if self.index + 1 < self.words.len() {
            self.index += 1;
            self.activate();
        } else {
            self.stop_recognizer();
            self.complete = true;
        }
    }

    /// Reset transient state for the freshly active word
    fn activate(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.attempts = 0;
        self.elapsed_ms = 0;
        self.last_heard.clear();
        self.resolved = false;
        self.feedback = Feedback::Idle;
    }

    fn stop_recognizer(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
    }
}
