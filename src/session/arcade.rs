//! The chase game: a timed run over the falling-word pool.
//!
//! Every correct key moves the pursuer a step toward the runner; every
//! finished word lets the runner pull away a little and raises the level.
//! The game is won when the pursuer closes the gap and lost when the
//! countdown reaches zero.

use chrono::Utc;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ArcadeConfig;
use crate::content::WordTiers;
use crate::engine::level::{ArcadeLevel, LevelProgression};
use crate::engine::scoring::{self, Chase};
use crate::session::pool::{KeyOutcome, PoolEvent, WordPool, WordView};
use crate::session::result::{ArcadeSummary, SessionSummary};
use crate::session::timer::{Scheduler, TimerHandle};
use crate::session::SessionEvent;

pub const COUNTDOWN_PERIOD_SECS: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArcadeState {
    Ready,
    Running,
    Over { won: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcadeView {
    #[serde(flatten)]
    pub state: ArcadeState,
    pub level: u32,
    pub max_level: u32,
    pub score: u32,
    pub time_left: u32,
    pub pursuer_x: f64,
    pub runner_x: f64,
    pub closed_ratio: f64,
    pub correct_keys: u32,
    pub words_completed: u32,
    pub words_missed: u32,
}

pub struct ArcadeGame<R = SmallRng> {
    pool: WordPool<R>,
    levels: LevelProgression<ArcadeLevel>,
    settings: ArcadeConfig,
    scheduler: Scheduler,
    countdown: Option<TimerHandle>,
    state: ArcadeState,
    level: u32,
    time_left: u32,
    chase: Chase,
    correct_keys: u32,
    words_completed: u32,
    words_missed: u32,
    started_at: f64,
    clock: f64,
    summary: Option<ArcadeSummary>,
}

impl ArcadeGame<SmallRng> {
    pub fn new(tiers: WordTiers, settings: ArcadeConfig) -> Self {
        Self::with_rng(tiers, settings, SmallRng::from_entropy())
    }
}

impl<R: Rng> ArcadeGame<R> {
    pub fn with_rng(tiers: WordTiers, mut settings: ArcadeConfig, rng: R) -> Self {
        settings.normalize();
        let levels = LevelProgression::arcade(settings.max_level);
        let level = levels.clamp(settings.start_level);
        let pool = WordPool::with_rng(tiers, levels.tier_for(level).clone(), rng);
        Self {
            pool,
            levels,
            time_left: settings.time_limit_secs,
            settings,
            scheduler: Scheduler::new(),
            countdown: None,
            state: ArcadeState::Ready,
            level,
            chase: Chase::default(),
            correct_keys: 0,
            words_completed: 0,
            words_missed: 0,
            started_at: 0.0,
            clock: 0.0,
            summary: None,
        }
    }

    /// Begin the countdown. Only meaningful from `Ready`.
    pub fn start(&mut self, clock: f64) {
        if self.state != ArcadeState::Ready {
            return;
        }
        self.clock = clock;
        self.started_at = clock;
        self.pool.clear(clock);
        self.countdown = Some(self.scheduler.every(clock, COUNTDOWN_PERIOD_SECS));
        self.state = ArcadeState::Running;
        info!(level = self.level, time_limit = self.time_left, "chase started");
    }

    /// Throw away the current run and start a fresh one.
    pub fn restart(&mut self, clock: f64) {
        self.teardown();
        self.level = self.levels.clamp(self.settings.start_level);
        self.pool.set_level(self.levels.tier_for(self.level).clone());
        self.time_left = self.settings.time_limit_secs;
        self.chase = Chase::default();
        self.correct_keys = 0;
        self.words_completed = 0;
        self.words_missed = 0;
        self.summary = None;
        self.state = ArcadeState::Ready;
        self.start(clock);
    }

    pub fn tick(&mut self, clock: f64) -> Vec<SessionEvent> {
        self.clock = clock;
        if self.state != ArcadeState::Running {
            return Vec::new();
        }

        for handle in self.scheduler.advance(clock) {
            if Some(handle) == self.countdown {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left == 0 {
                    return self.end(false);
                }
            }
        }

        let mut events = Vec::new();
        for event in self.pool.tick(clock) {
            if let PoolEvent::Escaped { text, .. } = event {
                self.words_missed += 1;
                events.push(SessionEvent::WordEscaped { text });
            }
        }
        events
    }

    pub fn submit_key(&mut self, ch: char) -> Vec<SessionEvent> {
        if self.state != ArcadeState::Running {
            return Vec::new();
        }
        let outcome = self.pool.submit_key(ch);
        if !outcome.is_correct() {
            return Vec::new();
        }

        let mut events = vec![SessionEvent::CorrectKey];
        self.correct_keys += 1;
        let caught = self.chase.advance_pursuer();

        if let KeyOutcome::Completed { text, .. } = outcome {
            self.words_completed += 1;
            events.push(SessionEvent::WordComplete { text });
            if !caught {
                self.chase.runner_escapes(self.level);
            }
            let next = scoring::next_level(self.level, self.levels.max_level());
            if next != self.level {
                self.level = next;
                self.pool.set_level(self.levels.tier_for(next).clone());
                info!(level = next, "chase level up");
                events.push(SessionEvent::LevelChanged { level: next });
            }
        }

        if caught {
            events.extend(self.end(true));
        }
        events
    }

    fn end(&mut self, won: bool) -> Vec<SessionEvent> {
        self.teardown();
        self.state = ArcadeState::Over { won };
        let summary = ArcadeSummary {
            won,
            score: self.score(),
            level: self.level,
            correct_keys: self.correct_keys,
            words_completed: self.words_completed,
            words_missed: self.words_missed,
            elapsed_secs: (self.clock - self.started_at).max(0.0),
            timestamp: Utc::now(),
        };
        info!(won, score = summary.score, "chase over");
        self.summary = Some(summary.clone());
        vec![SessionEvent::SessionComplete(SessionSummary::Arcade(summary))]
    }

    /// Release every timer and empty the field.
    pub fn teardown(&mut self) {
        if self.scheduler.pending() > 0 {
            debug!(timers = self.scheduler.pending(), "cancelling chase timers");
        }
        self.scheduler.cancel_all();
        self.countdown = None;
        self.pool.clear(self.clock);
    }

    pub fn state(&self) -> ArcadeState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, ArcadeState::Over { .. })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn score(&self) -> u32 {
        scoring::score_for(self.correct_keys, self.words_completed)
    }

    pub fn chase(&self) -> &Chase {
        &self.chase
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn summary(&self) -> Option<&ArcadeSummary> {
        self.summary.as_ref()
    }

    pub fn pool(&self) -> &WordPool<R> {
        &self.pool
    }

    /// For scripted placement via [`WordPool::insert_word`].
    pub fn pool_mut(&mut self) -> &mut WordPool<R> {
        &mut self.pool
    }

    pub fn words(&self) -> Vec<WordView> {
        self.pool.snapshot()
    }

    pub fn view(&self) -> ArcadeView {
        ArcadeView {
            state: self.state,
            level: self.level,
            max_level: self.levels.max_level(),
            score: self.score(),
            time_left: self.time_left,
            pursuer_x: self.chase.pursuer_x,
            runner_x: self.chase.runner_x,
            closed_ratio: self.chase.closed_ratio(),
            correct_keys: self.correct_keys,
            words_completed: self.words_completed,
            words_missed: self.words_missed,
        }
    }
}

impl<R> Drop for ArcadeGame<R> {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
