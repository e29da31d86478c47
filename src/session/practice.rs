use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::engine::level::LevelProgression;
use crate::engine::metrics;
use crate::error::ContentError;
use crate::session::input::CharStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Idle,
    InProgress,
    Completed,
}

/// What a single update did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing changed: the session is complete or the input is the same.
    Ignored,
    /// The input became empty.
    Cleared,
    Correct,
    Incorrect,
    /// A backspace shortened the input without emptying or completing it.
    Edited,
    /// The input now equals the target. Only reported once per session.
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PracticeMetrics {
    pub accuracy: u32,
    pub wpm: u32,
    pub error_count: u32,
    pub completed: bool,
}

/// Sequential matcher for one target text. The typed input is compared
/// position by position: a wrong character still occupies its slot, so the
/// next expected character is always `target[typed.len()]`.
#[derive(Clone, Debug)]
pub struct PracticeSession {
    target_text: String,
    target: Vec<char>,
    typed: Vec<char>,
    marks: Vec<CharStatus>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    error_count: u32,
    accuracy: u32,
    wpm: u32,
    state: MatchState,
}

impl PracticeSession {
    pub fn new(text: &str) -> Self {
        Self {
            target_text: text.to_string(),
            target: text.chars().collect(),
            typed: Vec::new(),
            marks: Vec::new(),
            started_at: None,
            finished_at: None,
            error_count: 0,
            accuracy: 100,
            wpm: 0,
            state: MatchState::Idle,
        }
    }

    pub fn push(&mut self, ch: char, at: Instant) -> UpdateOutcome {
        if self.is_complete() {
            return UpdateOutcome::Ignored;
        }
        self.typed.push(ch);
        self.apply(at)
    }

    pub fn backspace(&mut self, at: Instant) -> UpdateOutcome {
        if self.is_complete() {
            return UpdateOutcome::Ignored;
        }
        self.typed.pop();
        match self.apply(at) {
            UpdateOutcome::Correct | UpdateOutcome::Incorrect => UpdateOutcome::Edited,
            outcome => outcome,
        }
    }

    /// Replace the whole input, as a text field edit would.
    pub fn set_input(&mut self, input: &str, at: Instant) -> UpdateOutcome {
        if self.is_complete() {
            return UpdateOutcome::Ignored;
        }
        let input: Vec<char> = input.chars().collect();
        if input == self.typed {
            return UpdateOutcome::Ignored;
        }
        self.typed = input;
        self.apply(at)
    }

    fn apply(&mut self, at: Instant) -> UpdateOutcome {
        if self.started_at.is_none() && !self.typed.is_empty() {
            self.started_at = Some(at);
        }

        self.marks = self
            .typed
            .iter()
            .enumerate()
            .map(|(i, &ch)| status_for(ch, self.target.get(i).copied()))
            .collect();
        self.accuracy = metrics::accuracy(&self.typed, &self.target);

        let outcome = match self.marks.last() {
            None => UpdateOutcome::Cleared,
            Some(CharStatus::Correct) => UpdateOutcome::Correct,
            Some(CharStatus::Incorrect(_)) => {
                self.error_count += 1;
                UpdateOutcome::Incorrect
            }
        };

        if self.typed == self.target {
            self.state = MatchState::Completed;
            self.finished_at = Some(at);
            self.wpm = metrics::wpm(&self.target_text, self.started_at, at);
            debug!(wpm = self.wpm, errors = self.error_count, "practice text completed");
            return UpdateOutcome::Completed;
        }

        self.state = if self.typed.is_empty() && self.started_at.is_none() {
            MatchState::Idle
        } else {
            MatchState::InProgress
        };
        outcome
    }

    pub fn is_complete(&self) -> bool {
        self.state == MatchState::Completed
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn typed_text(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn status_at(&self, idx: usize) -> Option<CharStatus> {
        self.marks.get(idx).copied()
    }

    pub fn marks(&self) -> &[CharStatus] {
        &self.marks
    }

    pub fn next_expected(&self) -> Option<char> {
        self.target.get(self.typed.len()).copied()
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        (self.typed.len() as f64 / self.target.len() as f64).min(1.0)
    }

    pub fn metrics(&self) -> PracticeMetrics {
        PracticeMetrics {
            accuracy: self.accuracy,
            wpm: self.wpm,
            error_count: self.error_count,
            completed: self.is_complete(),
        }
    }

    pub fn view(&self) -> PracticeView {
        PracticeView {
            target: self.target_text.clone(),
            typed: self.typed_text(),
            marks: self.marks.clone(),
            next_expected: self.next_expected(),
            state: self.state,
            metrics: self.metrics(),
            progress: self.progress(),
        }
    }
}

fn status_for(typed: char, expected: Option<char>) -> CharStatus {
    if expected == Some(typed) {
        CharStatus::Correct
    } else {
        CharStatus::Incorrect(typed)
    }
}

/// Read-only copy of a practice session for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PracticeView {
    pub target: String,
    pub typed: String,
    pub marks: Vec<CharStatus>,
    pub next_expected: Option<char>,
    pub state: MatchState,
    #[serde(flatten)]
    pub metrics: PracticeMetrics,
    pub progress: f64,
}

/// Level-indexed practice: each level picks its text deterministically, and
/// any level change starts a fresh session.
#[derive(Clone, Debug)]
pub struct PracticeRun {
    texts: LevelProgression<String>,
    level: u32,
    custom: Option<String>,
    session: PracticeSession,
}

impl PracticeRun {
    pub fn new(texts: LevelProgression<String>, level: u32) -> Self {
        let level = texts.clamp(level);
        let session = PracticeSession::new(texts.tier_for(level));
        Self {
            texts,
            level,
            custom: None,
            session,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.texts.max_level()
    }

    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }

    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PracticeSession {
        &mut self.session
    }

    pub fn set_level(&mut self, level: u32) -> u32 {
        self.level = self.texts.clamp(level);
        self.custom = None;
        self.session = PracticeSession::new(self.texts.tier_for(self.level));
        debug!(level = self.level, "practice level selected");
        self.level
    }

    pub fn next_level(&mut self) -> u32 {
        self.set_level(self.level + 1)
    }

    pub fn restart(&mut self) {
        let text = match &self.custom {
            Some(custom) => custom.as_str(),
            None => self.texts.tier_for(self.level).as_str(),
        };
        self.session = PracticeSession::new(text);
    }

    /// Practice a user-supplied text instead of the level's text.
    pub fn custom(&mut self, text: &str) -> Result<(), ContentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ContentError::EmptyCustomText);
        }
        self.custom = Some(text.to_string());
        self.session = PracticeSession::new(text);
        Ok(())
    }
}
