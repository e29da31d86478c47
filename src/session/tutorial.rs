use std::time::Instant;

use tracing::info;

use crate::content::{Course, CourseKind, Lesson};
use crate::engine::level::LevelProgression;
use crate::error::ContentError;
use crate::session::practice::{PracticeSession, UpdateOutcome};
use crate::session::result::{PracticeSummary, SessionSummary};
use crate::session::timer::{Scheduler, TimerHandle};
use crate::session::SessionEvent;

/// Delay between finishing a lesson and moving on to the next one.
pub const AUTO_ADVANCE_SECS: f64 = 1.0;

/// A guided course: one practice session per lesson, moving on by itself a
/// moment after each lesson is typed out.
pub struct TutorialSession {
    kind: CourseKind,
    title: String,
    lessons: LevelProgression<Lesson>,
    index: usize,
    session: PracticeSession,
    scheduler: Scheduler,
    advance: Option<TimerHandle>,
    clock: f64,
}

impl TutorialSession {
    pub fn new(kind: CourseKind, course: &Course) -> Result<Self, ContentError> {
        course.validate()?;
        let lessons = course.progression()?;
        let session = PracticeSession::new(&lessons.tier_for(1).text);
        Ok(Self {
            kind,
            title: course.title.clone(),
            lessons,
            index: 0,
            session,
            scheduler: Scheduler::new(),
            advance: None,
            clock: 0.0,
        })
    }

    pub fn kind(&self) -> CourseKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lesson(&self) -> &Lesson {
        self.lessons.tier_for(self.index as u32 + 1)
    }

    pub fn lesson_index(&self) -> usize {
        self.index
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.tiers().len()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.lesson_count()
    }

    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    pub fn advance_pending(&self) -> bool {
        self.advance.is_some()
    }

    pub fn push(&mut self, ch: char, at: Instant) -> Vec<SessionEvent> {
        let outcome = self.session.push(ch, at);
        self.handle(outcome, true)
    }

    pub fn backspace(&mut self, at: Instant) -> Vec<SessionEvent> {
        let outcome = self.session.backspace(at);
        self.handle(outcome, false)
    }

    /// `keyed` is false for edits, which never count as correct keystrokes.
    fn handle(&mut self, outcome: UpdateOutcome, keyed: bool) -> Vec<SessionEvent> {
        match outcome {
            UpdateOutcome::Correct => vec![SessionEvent::CorrectKey],
            UpdateOutcome::Completed => {
                if !self.is_last() {
                    self.advance = Some(self.scheduler.once(self.clock, AUTO_ADVANCE_SECS));
                }
                let summary = PracticeSummary::from_session(
                    &self.session,
                    course_mode(self.kind),
                    self.index as u32 + 1,
                );
                let mut events = Vec::new();
                if keyed {
                    events.push(SessionEvent::CorrectKey);
                }
                events.push(SessionEvent::SessionComplete(SessionSummary::Practice(summary)));
                events
            }
            UpdateOutcome::Ignored
            | UpdateOutcome::Cleared
            | UpdateOutcome::Incorrect
            | UpdateOutcome::Edited => Vec::new(),
        }
    }

    pub fn tick(&mut self, clock: f64) -> Vec<SessionEvent> {
        self.clock = clock;
        let mut events = Vec::new();
        for handle in self.scheduler.advance(clock) {
            if Some(handle) == self.advance {
                self.advance = None;
                self.go_to(self.index + 1);
                events.push(SessionEvent::LessonAdvanced { index: self.index });
            }
        }
        events
    }

    /// Jump to a lesson, clamped to the course. Cancels a pending advance.
    pub fn select(&mut self, index: usize) {
        if let Some(handle) = self.advance.take() {
            self.scheduler.cancel(handle);
        }
        self.go_to(index);
    }

    pub fn restart_lesson(&mut self) {
        self.select(self.index);
    }

    fn go_to(&mut self, index: usize) {
        let level = self.lessons.clamp(index as u32 + 1);
        self.index = level as usize - 1;
        self.session = PracticeSession::new(&self.lessons.tier_for(level).text);
        info!(course = %self.title, lesson = self.index, "tutorial lesson started");
    }
}

impl Drop for TutorialSession {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}

fn course_mode(kind: CourseKind) -> &'static str {
    match kind {
        CourseKind::Basic => "basic-tutorial",
        CourseKind::Advanced => "advanced-tutorial",
    }
}
