//! The falling-word field of the chase game.
//!
//! Words spawn near the top of the field, fall a little every tick and are
//! typed one at a time. Exactly one eligible word is "active" and receives
//! keystrokes; the rest wait their turn.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::content::{WordTiers, is_arcade_word};
use crate::engine::level::ArcadeLevel;
use crate::error::ContentError;
use crate::session::input::arcade_char;

pub const SPAWN_X_MIN: f64 = -8.0;
pub const SPAWN_X_MAX: f64 = 8.0;
pub const SPAWN_Y_MIN: f64 = 3.0;
pub const SPAWN_Y_MAX: f64 = 5.0;
pub const SPEED_JITTER: f64 = 0.005;
/// Words at or below this height have left the field and can't be typed.
pub const EXIT_Y: f64 = -2.0;
/// Words at or below this height are dropped from the pool.
pub const DESPAWN_Y: f64 = -3.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    id: u64,
    text: String,
    x: f64,
    y: f64,
    current_index: usize,
    speed: f64,
    is_active: bool,
    escaped: bool,
}

impl Word {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn escaped(&self) -> bool {
        self.escaped
    }

    pub fn typed(&self) -> &str {
        &self.text[..self.current_index]
    }

    pub fn remaining(&self) -> &str {
        &self.text[self.current_index..]
    }

    fn is_eligible(&self) -> bool {
        !self.escaped
    }

    fn expected(&self) -> Option<char> {
        self.text
            .as_bytes()
            .get(self.current_index)
            .map(|b| b.to_ascii_lowercase() as char)
    }

    pub fn view(&self) -> WordView {
        WordView {
            id: self.id,
            text: self.text.clone(),
            x: self.x,
            y: self.y,
            current_index: self.current_index,
            is_active: self.is_active,
            escaped: self.escaped,
        }
    }
}

/// Render-side copy of a word.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordView {
    pub id: u64,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub current_index: usize,
    pub is_active: bool,
    pub escaped: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PoolEvent {
    Spawned { id: u64, text: String },
    Escaped { id: u64, text: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum KeyOutcome {
    /// Not a letter.
    Ignored,
    /// Nothing to type into.
    Dropped,
    Mismatch { expected: char },
    Correct { id: u64 },
    /// Correct key that finished the word; the word is already gone.
    Completed { id: u64, text: String },
}

impl KeyOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, KeyOutcome::Correct { .. } | KeyOutcome::Completed { .. })
    }
}

pub struct WordPool<R = SmallRng> {
    words: Vec<Word>,
    tiers: WordTiers,
    params: ArcadeLevel,
    active: Option<u64>,
    next_id: u64,
    last_spawn: f64,
    rng: R,
}

impl WordPool<SmallRng> {
    pub fn new(tiers: WordTiers, params: ArcadeLevel) -> Self {
        Self::with_rng(tiers, params, SmallRng::from_entropy())
    }
}

impl<R: Rng> WordPool<R> {
    pub fn with_rng(tiers: WordTiers, params: ArcadeLevel, rng: R) -> Self {
        Self {
            words: Vec::new(),
            tiers,
            params,
            active: None,
            next_id: 1,
            last_spawn: 0.0,
            rng,
        }
    }

    pub fn params(&self) -> &ArcadeLevel {
        &self.params
    }

    pub fn level(&self) -> u32 {
        self.params.level
    }

    /// Applies to words spawned from now on; falling words keep their speed.
    pub fn set_level(&mut self, params: ArcadeLevel) {
        debug!(level = params.level, "word pool level changed");
        self.params = params;
    }

    /// Drop every word and restart the spawn clock at `clock`.
    pub fn clear(&mut self, clock: f64) {
        self.words.clear();
        self.active = None;
        self.last_spawn = clock;
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn active(&self) -> Option<&Word> {
        self.active
            .and_then(|id| self.words.iter().find(|w| w.id == id))
    }

    pub fn snapshot(&self) -> Vec<WordView> {
        self.words.iter().map(Word::view).collect()
    }

    /// Place a word by hand. Returns its id.
    pub fn insert_word(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        speed: f64,
    ) -> Result<u64, ContentError> {
        if !is_arcade_word(text) {
            return Err(ContentError::UntypeableWord(text.to_string()));
        }
        Ok(self.push_word(text.to_string(), x, y, speed))
    }

    fn push_word(&mut self, text: String, x: f64, y: f64, speed: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let escaped = y <= EXIT_Y;
        let is_active = self.active.is_none() && !escaped;
        if is_active {
            self.active = Some(id);
        }
        self.words.push(Word {
            id,
            text,
            x,
            y,
            current_index: 0,
            speed,
            is_active,
            escaped,
        });
        id
    }

    fn spawn(&mut self) -> Option<(u64, String)> {
        let candidates = self.tiers.pool_len(self.params.tiers);
        if candidates == 0 {
            return None;
        }
        let pick = self.rng.gen_range(0..candidates);
        let text = self.tiers.pick(self.params.tiers, pick)?.to_string();
        let x = self.rng.gen_range(SPAWN_X_MIN..SPAWN_X_MAX);
        let y = self.rng.gen_range(SPAWN_Y_MIN..SPAWN_Y_MAX);
        let speed = self.params.base_speed + self.rng.gen_range(0.0..SPEED_JITTER);
        let id = self.push_word(text.clone(), x, y, speed);
        Some((id, text))
    }

    /// One frame: spawn, then fall, then retire words that left the field.
    pub fn tick(&mut self, clock: f64) -> Vec<PoolEvent> {
        let mut events = Vec::new();

        if clock - self.last_spawn > self.params.spawn_interval {
            if let Some((id, text)) = self.spawn() {
                debug!(id, word = %text, "spawned word");
                events.push(PoolEvent::Spawned { id, text });
            }
            self.last_spawn = clock;
        }

        for word in &mut self.words {
            word.y -= word.speed;
        }

        for word in &mut self.words {
            if !word.escaped && word.y <= EXIT_Y {
                word.escaped = true;
                debug!(id = word.id, word = %word.text, "word escaped");
                events.push(PoolEvent::Escaped {
                    id: word.id,
                    text: word.text.clone(),
                });
            }
        }
        self.words.retain(|w| w.y > DESPAWN_Y);

        self.select_active();
        events
    }

    pub fn submit_key(&mut self, ch: char) -> KeyOutcome {
        let Some(ch) = arcade_char(ch) else {
            return KeyOutcome::Ignored;
        };
        let Some(pos) = self
            .active
            .and_then(|id| self.words.iter().position(|w| w.id == id))
        else {
            return KeyOutcome::Dropped;
        };

        let word = &mut self.words[pos];
        let Some(expected) = word.expected() else {
            return KeyOutcome::Dropped;
        };
        if expected != ch {
            return KeyOutcome::Mismatch { expected };
        }

        word.current_index += 1;
        let id = word.id;
        if word.current_index < word.text.len() {
            return KeyOutcome::Correct { id };
        }

        let word = self.words.remove(pos);
        debug!(id, word = %word.text, "word completed");
        self.active = None;
        self.select_active();
        KeyOutcome::Completed {
            id,
            text: word.text,
        }
    }

    /// Keep the current active word while it is still eligible, otherwise
    /// hand focus to the highest eligible word (lowest id on a tie).
    fn select_active(&mut self) {
        let keep = self
            .active
            .filter(|id| self.words.iter().any(|w| w.id == *id && w.is_eligible()));
        let next = keep.or_else(|| {
            self.words
                .iter()
                .filter(|w| w.is_eligible())
                .max_by(|a, b| a.y.total_cmp(&b.y).then(b.id.cmp(&a.id)))
                .map(|w| w.id)
        });
        self.active = next;
        for word in &mut self.words {
            word.is_active = Some(word.id) == next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_tiers;
    use crate::engine::level::Tier;

    fn pool(level: u32) -> WordPool<SmallRng> {
        WordPool::with_rng(test_tiers(), ArcadeLevel::new(level), SmallRng::seed_from_u64(7))
    }

    fn active_count(pool: &WordPool<SmallRng>) -> usize {
        pool.words().iter().filter(|w| w.is_active()).count()
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let mut pool = pool(1);
        assert!(pool.tick(4.5).is_empty());
        assert!(pool.words().is_empty());

        let events = pool.tick(4.61);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], PoolEvent::Spawned { .. }));
        assert_eq!(pool.words().len(), 1);

        assert!(pool.tick(9.2).is_empty());
        assert_eq!(pool.tick(9.22).len(), 1);
        assert_eq!(pool.words().len(), 2);
    }

    #[test]
    fn test_spawned_word_parameters() {
        let mut pool = pool(1);
        pool.tick(5.0);
        let word = &pool.words()[0];
        let base = ArcadeLevel::new(1).base_speed;

        assert!(word.speed() >= base && word.speed() < base + SPEED_JITTER);
        assert!(word.x() >= SPAWN_X_MIN && word.x() < SPAWN_X_MAX);
        // spawned then moved once in the same tick
        let start = word.y() + word.speed();
        assert!(start >= SPAWN_Y_MIN && start < SPAWN_Y_MAX);
        assert_eq!(word.current_index(), 0);
        assert!(word.is_active());
        assert!(test_tiers().words(Tier::Easy).iter().any(|w| w == word.text()));
    }

    #[test]
    fn test_high_levels_draw_medium_and_hard() {
        let mut pool = pool(8);
        let tiers = test_tiers();
        let mut clock = 0.0;
        for _ in 0..20 {
            clock += 2.0;
            pool.tick(clock);
        }
        assert!(!pool.words().is_empty());
        for word in pool.words() {
            assert!(
                !tiers.words(Tier::Easy).iter().any(|w| w == word.text()),
                "easy word {} at level 8",
                word.text()
            );
        }
    }

    #[test]
    fn test_motion_over_ticks() {
        let mut pool = pool(1);
        pool.insert_word("cat", 0.0, 4.0, 0.02).unwrap();
        for _ in 0..100 {
            pool.tick(0.0);
        }
        assert!((pool.words()[0].y() - 2.0).abs() < 1e-9);
        for _ in 0..200 {
            pool.tick(0.0);
        }
        assert!((pool.words()[0].y() + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_escape_then_despawn() {
        let mut pool = pool(1);
        let id = pool.insert_word("cat", 0.0, 4.0, 0.02).unwrap();

        let mut escapes = 0;
        for _ in 0..310 {
            for event in pool.tick(0.0) {
                if let PoolEvent::Escaped { id: escaped, .. } = event {
                    assert_eq!(escaped, id);
                    escapes += 1;
                }
            }
        }
        assert_eq!(escapes, 1);
        let word = &pool.words()[0];
        assert!(word.escaped());
        assert!(!word.is_active());
        assert!(pool.active().is_none());
        assert_eq!(pool.submit_key('c'), KeyOutcome::Dropped);

        for _ in 0..60 {
            pool.tick(0.0);
        }
        assert!(pool.words().is_empty());
    }

    #[test]
    fn test_first_word_becomes_active_and_keeps_focus() {
        let mut pool = pool(1);
        let low = pool.insert_word("go", 0.0, 3.5, 0.0).unwrap();
        pool.insert_word("see", 0.0, 4.2, 0.0).unwrap();
        pool.tick(0.0);
        assert_eq!(pool.active().map(Word::id), Some(low));
        assert_eq!(active_count(&pool), 1);
    }

    #[test]
    fn test_reselect_prefers_highest_word() {
        let mut pool = pool(1);
        pool.insert_word("a", 0.0, 1.0, 0.0).unwrap();
        pool.insert_word("go", 0.0, 3.5, 0.0).unwrap();
        let high = pool.insert_word("see", 0.0, 4.2, 0.0).unwrap();

        assert!(matches!(pool.submit_key('a'), KeyOutcome::Completed { .. }));
        assert_eq!(pool.active().map(Word::id), Some(high));
        assert_eq!(active_count(&pool), 1);
    }

    #[test]
    fn test_reselect_tie_goes_to_lowest_id() {
        let mut pool = pool(1);
        pool.insert_word("a", 0.0, 1.0, 0.0).unwrap();
        let first = pool.insert_word("go", 0.0, 4.0, 0.0).unwrap();
        pool.insert_word("see", 0.0, 4.0, 0.0).unwrap();

        pool.submit_key('a');
        assert_eq!(pool.active().map(Word::id), Some(first));
    }

    #[test]
    fn test_escaped_active_word_hands_over_focus() {
        let mut pool = pool(1);
        let fast = pool.insert_word("run", 0.0, -1.9, 0.2).unwrap();
        let slow = pool.insert_word("go", 0.0, 4.0, 0.0).unwrap();
        assert_eq!(pool.active().map(Word::id), Some(fast));

        pool.tick(0.0);
        assert_eq!(pool.active().map(Word::id), Some(slow));
    }

    #[test]
    fn test_keystrokes_advance_active_word_only() {
        let mut pool = pool(1);
        let cat = pool.insert_word("cat", 0.0, 4.0, 0.0).unwrap();
        let car = pool.insert_word("car", 0.0, 3.0, 0.0).unwrap();

        assert_eq!(pool.submit_key('C'), KeyOutcome::Correct { id: cat });
        assert_eq!(pool.submit_key('x'), KeyOutcome::Mismatch { expected: 'a' });
        assert_eq!(pool.submit_key('a'), KeyOutcome::Correct { id: cat });
        assert_eq!(pool.submit_key('1'), KeyOutcome::Ignored);
        assert_eq!(pool.words()[1].current_index(), 0);

        assert_eq!(
            pool.submit_key('t'),
            KeyOutcome::Completed {
                id: cat,
                text: "cat".to_string()
            }
        );
        assert_eq!(pool.words().len(), 1);
        assert_eq!(pool.active().map(Word::id), Some(car));
        assert_eq!(pool.words()[0].current_index(), 0);
    }

    #[test]
    fn test_empty_pool_drops_keys() {
        let mut pool = pool(1);
        assert_eq!(pool.submit_key('a'), KeyOutcome::Dropped);
        assert_eq!(pool.submit_key(';'), KeyOutcome::Ignored);
    }

    #[test]
    fn test_insert_rejects_non_letters() {
        let mut pool = pool(1);
        assert!(pool.insert_word("", 0.0, 4.0, 0.01).is_err());
        assert!(pool.insert_word("hand cuffs", 0.0, 4.0, 0.01).is_err());
        assert!(pool.words().is_empty());
    }

    #[test]
    fn test_clear_resets_spawn_clock() {
        let mut pool = pool(1);
        pool.tick(5.0);
        assert!(!pool.words().is_empty());
        pool.clear(10.0);
        assert!(pool.words().is_empty());
        assert!(pool.active().is_none());
        assert!(pool.tick(14.0).is_empty());
        assert_eq!(pool.tick(14.7).len(), 1);
    }

    #[test]
    fn test_invariants_hold_under_random_play() {
        let mut pool = pool(6);
        let mut keys = SmallRng::seed_from_u64(99);
        let mut last_index: std::collections::HashMap<u64, usize> = Default::default();

        for frame in 0..5000 {
            let clock = frame as f64 / 60.0;
            pool.tick(clock);
            let key = if keys.gen_bool(0.5) {
                pool.active()
                    .and_then(|w| w.remaining().chars().next())
                    .unwrap_or('z')
            } else {
                keys.gen_range(b'a'..=b'z') as char
            };
            let before = pool.active().map(Word::id);
            let outcome = pool.submit_key(key);

            assert!(active_count(&pool) <= 1);
            if let Some(active) = pool.active() {
                assert!(!active.escaped());
            }
            for word in pool.words() {
                let prev = last_index.insert(word.id(), word.current_index()).unwrap_or(0);
                if Some(word.id()) == before && matches!(outcome, KeyOutcome::Correct { .. }) {
                    assert_eq!(word.current_index(), prev + 1);
                } else {
                    assert_eq!(word.current_index(), prev);
                }
            }
        }
    }
}
