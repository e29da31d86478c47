use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::content::{Content, ContentProvider, CourseKind};
use crate::error::ContentError;
use crate::keyboard::finger::{self, FingerAssignment};
use crate::session::arcade::{ArcadeGame, ArcadeView};
use crate::session::input;
use crate::session::pool::WordView;
use crate::session::practice::{PracticeRun, PracticeView, UpdateOutcome};
use crate::session::result::{PracticeSummary, SessionSummary};
use crate::session::tutorial::TutorialSession;
use crate::session::{Listener, SessionEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppScreen {
    Menu,
    Practice,
    Tutorial,
    Arcade,
    Results,
}

pub struct MenuEntry {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        key: '1',
        label: "Practice",
        description: "Type pangrams, one level at a time",
    },
    MenuEntry {
        key: '2',
        label: "Basic Tutorial",
        description: "Home row, top row, bottom row",
    },
    MenuEntry {
        key: '3',
        label: "Advanced Tutorial",
        description: "Speed, numbers, symbols and shortcuts",
    },
    MenuEntry {
        key: '4',
        label: "Chase",
        description: "Type falling words to catch the runner",
    },
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LessonView {
    pub course: CourseKind,
    pub index: usize,
    pub count: usize,
    pub title: String,
    pub summary: String,
    pub tips: Vec<String>,
    pub focus_keys: Vec<String>,
    pub advance_pending: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct KeyHint {
    pub key: char,
    pub finger: Option<FingerAssignment>,
    pub shift: bool,
}

impl KeyHint {
    pub fn for_char(key: char) -> Self {
        Self {
            key,
            finger: finger::qwerty_finger(key),
            shift: finger::needs_shift(key),
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: AppScreen,
    /// Level of the current session; 0 when no session is running.
    pub level: u32,
    pub clock: f64,
    pub words: Vec<WordView>,
    pub practice: Option<PracticeView>,
    pub arcade: Option<ArcadeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson: Option<LessonView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<KeyHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

/// Owns the session for whichever mode is running and routes ticks and
/// keystrokes to it. Session events are handed to every subscribed listener
/// and returned to the caller.
pub struct App {
    pub screen: AppScreen,
    pub menu_selected: usize,
    pub should_quit: bool,
    pub config: Config,
    content: Content,
    practice: Option<PracticeRun>,
    tutorial: Option<TutorialSession>,
    arcade: Option<ArcadeGame>,
    listeners: Vec<Box<dyn Listener>>,
    last_summary: Option<SessionSummary>,
    result_source: Option<AppScreen>,
    clock: f64,
}

impl App {
    pub fn new(config: Config, content: Content) -> Self {
        Self {
            screen: AppScreen::Menu,
            menu_selected: 0,
            should_quit: false,
            config,
            content,
            practice: None,
            tutorial: None,
            arcade: None,
            listeners: Vec::new(),
            last_summary: None,
            result_source: None,
            clock: 0.0,
        }
    }

    /// Build from a config, loading content from its `content_dir` if set.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let content = Content::load(config.content_dir.as_deref())?;
        Ok(Self::new(config, content))
    }

    pub fn subscribe(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn practice(&self) -> Option<&PracticeRun> {
        self.practice.as_ref()
    }

    pub fn tutorial(&self) -> Option<&TutorialSession> {
        self.tutorial.as_ref()
    }

    pub fn arcade(&self) -> Option<&ArcadeGame> {
        self.arcade.as_ref()
    }

    pub fn arcade_mut(&mut self) -> Option<&mut ArcadeGame> {
        self.arcade.as_mut()
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// The mode whose session is on display: the current screen, or the mode
    /// that produced the results being shown.
    fn focus(&self) -> AppScreen {
        match self.screen {
            AppScreen::Results => self.result_source.unwrap_or(AppScreen::Menu),
            screen => screen,
        }
    }

    fn end_sessions(&mut self) {
        self.practice = None;
        self.tutorial = None;
        self.arcade = None;
        self.last_summary = None;
        self.result_source = None;
    }

    pub fn go_to_menu(&mut self) {
        self.end_sessions();
        self.screen = AppScreen::Menu;
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = (self.menu_selected + 1) % MENU.len();
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = self.menu_selected.checked_sub(1).unwrap_or(MENU.len() - 1);
    }

    pub fn activate_menu(&mut self, index: usize) -> Result<(), ContentError> {
        match index {
            0 => self.start_practice(self.config.practice_level),
            1 => self.start_tutorial(CourseKind::Basic),
            2 => self.start_tutorial(CourseKind::Advanced),
            3 => {
                self.start_arcade();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn start_practice(&mut self, level: u32) -> Result<(), ContentError> {
        let texts = self.content.practice_progression()?;
        self.end_sessions();
        let run = PracticeRun::new(texts, level);
        info!(level = run.level(), "practice started");
        self.practice = Some(run);
        self.screen = AppScreen::Practice;
        Ok(())
    }

    pub fn start_custom(&mut self, text: &str) -> Result<(), ContentError> {
        let texts = self.content.practice_progression()?;
        let mut run = PracticeRun::new(texts, 1);
        run.custom(text)?;
        self.end_sessions();
        info!(chars = run.session().target().len(), "custom practice started");
        self.practice = Some(run);
        self.screen = AppScreen::Practice;
        Ok(())
    }

    pub fn start_tutorial(&mut self, kind: CourseKind) -> Result<(), ContentError> {
        let mut tutorial = TutorialSession::new(kind, self.content.course(kind))?;
        tutorial.tick(self.clock);
        self.end_sessions();
        info!(course = tutorial.title(), "tutorial started");
        self.tutorial = Some(tutorial);
        self.screen = AppScreen::Tutorial;
        Ok(())
    }

    pub fn start_arcade(&mut self) {
        self.start_arcade_with_rng(SmallRng::from_entropy());
    }

    pub fn start_arcade_with_rng(&mut self, rng: SmallRng) {
        self.end_sessions();
        let mut game = ArcadeGame::with_rng(
            self.content.word_tiers().clone(),
            self.config.arcade.clone(),
            rng,
        );
        game.start(self.clock);
        self.arcade = Some(game);
        self.screen = AppScreen::Arcade;
    }

    /// Start the focused session over.
    pub fn restart(&mut self) {
        match self.focus() {
            AppScreen::Practice => {
                if let Some(run) = self.practice.as_mut() {
                    run.restart();
                }
            }
            AppScreen::Tutorial => {
                if let Some(tutorial) = self.tutorial.as_mut() {
                    tutorial.restart_lesson();
                }
            }
            AppScreen::Arcade => {
                if let Some(game) = self.arcade.as_mut() {
                    game.restart(self.clock);
                }
            }
            AppScreen::Menu | AppScreen::Results => return,
        }
        self.last_summary = None;
        self.screen = self.focus();
        self.result_source = None;
    }

    /// Move practice to the next level, or the tutorial to its next lesson.
    pub fn next_level(&mut self) {
        match self.focus() {
            AppScreen::Practice => {
                if let Some(run) = self.practice.as_mut() {
                    run.next_level();
                }
            }
            AppScreen::Tutorial => {
                if let Some(tutorial) = self.tutorial.as_mut() {
                    tutorial.select(tutorial.lesson_index() + 1);
                }
            }
            AppScreen::Arcade | AppScreen::Menu | AppScreen::Results => return,
        }
        self.last_summary = None;
        self.screen = self.focus();
        self.result_source = None;
    }

    pub fn set_practice_level(&mut self, level: u32) -> u32 {
        match self.practice.as_mut() {
            Some(run) => run.set_level(level),
            None => 0,
        }
    }

    pub fn submit_keystroke(&mut self, ch: char) -> Vec<SessionEvent> {
        self.submit_keystroke_at(ch, Instant::now())
    }

    pub fn submit_keystroke_at(&mut self, ch: char, at: Instant) -> Vec<SessionEvent> {
        let events = match self.screen {
            AppScreen::Practice => match (input::text_char(ch), self.practice.as_mut()) {
                (Some(ch), Some(run)) => {
                    let outcome = run.session_mut().push(ch, at);
                    practice_events(run, outcome, true)
                }
                _ => Vec::new(),
            },
            AppScreen::Tutorial => match (input::text_char(ch), self.tutorial.as_mut()) {
                (Some(ch), Some(tutorial)) => tutorial.push(ch, at),
                _ => Vec::new(),
            },
            AppScreen::Arcade => match self.arcade.as_mut() {
                Some(game) => game.submit_key(ch),
                None => Vec::new(),
            },
            AppScreen::Menu | AppScreen::Results => Vec::new(),
        };
        self.publish(events)
    }

    pub fn backspace(&mut self) -> Vec<SessionEvent> {
        self.backspace_at(Instant::now())
    }

    pub fn backspace_at(&mut self, at: Instant) -> Vec<SessionEvent> {
        let events = match self.screen {
            AppScreen::Practice => match self.practice.as_mut() {
                Some(run) => {
                    let outcome = run.session_mut().backspace(at);
                    practice_events(run, outcome, false)
                }
                None => Vec::new(),
            },
            AppScreen::Tutorial => match self.tutorial.as_mut() {
                Some(tutorial) => tutorial.backspace(at),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        self.publish(events)
    }

    /// Advance timers and word motion to `clock` seconds.
    pub fn tick(&mut self, clock: f64) -> Vec<SessionEvent> {
        self.clock = clock;
        let mut events = Vec::new();
        if let Some(tutorial) = self.tutorial.as_mut() {
            events.extend(tutorial.tick(clock));
        }
        if let Some(game) = self.arcade.as_mut() {
            events.extend(game.tick(clock));
        }
        self.publish(events)
    }

    fn publish(&mut self, events: Vec<SessionEvent>) -> Vec<SessionEvent> {
        for event in &events {
            for listener in &mut self.listeners {
                listener.notify(event);
            }
            if let SessionEvent::SessionComplete(summary) = event {
                self.last_summary = Some(summary.clone());
                // tutorials move on by themselves
                if self.screen != AppScreen::Tutorial {
                    debug!(from = ?self.screen, "showing results");
                    self.result_source = Some(self.screen);
                    self.screen = AppScreen::Results;
                }
            }
        }
        events
    }

    pub fn next_expected(&self) -> Option<char> {
        match self.focus() {
            AppScreen::Practice => self.practice.as_ref()?.session().next_expected(),
            AppScreen::Tutorial => self.tutorial.as_ref()?.session().next_expected(),
            AppScreen::Arcade => self
                .arcade
                .as_ref()?
                .pool()
                .active()
                .and_then(|w| w.remaining().chars().next()),
            AppScreen::Menu | AppScreen::Results => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let focus = self.focus();
        let level = match focus {
            AppScreen::Practice => self.practice.as_ref().map_or(0, PracticeRun::level),
            AppScreen::Tutorial => self
                .tutorial
                .as_ref()
                .map_or(0, |t| t.lesson_index() as u32 + 1),
            AppScreen::Arcade => self.arcade.as_ref().map_or(0, |g| g.level()),
            AppScreen::Menu | AppScreen::Results => 0,
        };
        let practice = match focus {
            AppScreen::Practice => self.practice.as_ref().map(|r| r.session().view()),
            AppScreen::Tutorial => self.tutorial.as_ref().map(|t| t.session().view()),
            _ => None,
        };
        let lesson = self.tutorial.as_ref().map(|t| {
            let lesson = t.lesson();
            LessonView {
                course: t.kind(),
                index: t.lesson_index(),
                count: t.lesson_count(),
                title: lesson.title.clone(),
                summary: lesson.summary.clone(),
                tips: lesson.tips.clone(),
                focus_keys: lesson.focus_keys.clone(),
                advance_pending: t.advance_pending(),
            }
        });

        Snapshot {
            mode: self.screen,
            level,
            clock: self.clock,
            words: self.arcade.as_ref().map(|g| g.words()).unwrap_or_default(),
            practice,
            arcade: self.arcade.as_ref().map(|g| g.view()),
            lesson,
            hint: self.next_expected().map(KeyHint::for_char),
            summary: self.last_summary.clone(),
        }
    }
}

/// `keyed` is false for edits, which never count as correct keystrokes.
fn practice_events(run: &PracticeRun, outcome: UpdateOutcome, keyed: bool) -> Vec<SessionEvent> {
    match outcome {
        UpdateOutcome::Correct => vec![SessionEvent::CorrectKey],
        UpdateOutcome::Completed => {
            let mode = if run.is_custom() { "custom" } else { "practice" };
            let summary = PracticeSummary::from_session(run.session(), mode, run.level());
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
