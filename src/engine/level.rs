use serde::{Deserialize, Serialize};

use crate::error::ContentError;

pub const SPAWN_INTERVAL_START_SECS: f64 = 5.0;
pub const SPAWN_INTERVAL_STEP_SECS: f64 = 0.4;
pub const SPAWN_INTERVAL_FLOOR_SECS: f64 = 1.5;
pub const BASE_SPEED: f64 = 0.005;
pub const SPEED_PER_LEVEL: f64 = 0.001;
pub const DEFAULT_ARCADE_LEVELS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

/// Word tiers drawn from at a given arcade level.
pub fn tiers_for_level(level: u32) -> &'static [Tier] {
    match level {
        0..=3 => &[Tier::Easy],
        4..=7 => &[Tier::Easy, Tier::Medium],
        _ => &[Tier::Medium, Tier::Hard],
    }
}

/// Seconds between word spawns; shrinks with level down to a floor.
pub fn spawn_interval(level: u32) -> f64 {
    (SPAWN_INTERVAL_START_SECS - level as f64 * SPAWN_INTERVAL_STEP_SECS)
        .max(SPAWN_INTERVAL_FLOOR_SECS)
}

/// Per-tick fall distance before the random jitter is added.
pub fn base_speed(level: u32) -> f64 {
    BASE_SPEED + level as f64 * SPEED_PER_LEVEL
}

/// Parameters the word pool runs with at one arcade level.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcadeLevel {
    pub level: u32,
    pub tiers: &'static [Tier],
    pub spawn_interval: f64,
    pub base_speed: f64,
}

impl ArcadeLevel {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            tiers: tiers_for_level(level),
            spawn_interval: spawn_interval(level),
            base_speed: base_speed(level),
        }
    }

    /// Levels `1..=max_level`, the layout the chase game ships with.
    pub fn ladder(max_level: u32) -> Vec<ArcadeLevel> {
        (1..=max_level.max(1)).map(ArcadeLevel::new).collect()
    }
}

/// Maps a 1-based level index onto an ordered, non-empty list of tiers.
/// Requests outside `1..=max_level` are clamped rather than rejected.
#[derive(Clone, Debug)]
pub struct LevelProgression<T> {
    tiers: Vec<T>,
}

impl<T> LevelProgression<T> {
    pub fn new(tiers: Vec<T>) -> Result<Self, ContentError> {
        if tiers.is_empty() {
            return Err(ContentError::NoTiers);
        }
        Ok(Self { tiers })
    }

    pub fn max_level(&self) -> u32 {
        self.tiers.len() as u32
    }

    pub fn clamp(&self, level: u32) -> u32 {
        level.clamp(1, self.max_level())
    }

    pub fn tier_for(&self, level: u32) -> &T {
        let idx = self.clamp(level) as usize - 1;
        &self.tiers[idx]
    }

    pub fn state(&self, level: u32) -> LevelState<'_, T> {
        let level = self.clamp(level);
        LevelState {
            level,
            tier: self.tier_for(level),
        }
    }

    pub fn tiers(&self) -> &[T] {
        &self.tiers
    }
}

impl LevelProgression<ArcadeLevel> {
    pub fn arcade(max_level: u32) -> Self {
        Self {
            tiers: ArcadeLevel::ladder(max_level),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct LevelState<'a, T> {
    pub level: u32,
    pub tier: &'a T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_endpoints() {
        assert!((spawn_interval(1) - 4.6).abs() < 1e-9);
        assert!((spawn_interval(10) - 1.5).abs() < 1e-9);
        assert!((spawn_interval(20) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_interval_decreases_until_floor() {
        for level in 1..9 {
            assert!(spawn_interval(level + 1) < spawn_interval(level));
        }
        assert!(spawn_interval(9) >= SPAWN_INTERVAL_FLOOR_SECS);
    }

    #[test]
    fn test_base_speed_grows_with_level() {
        assert!((base_speed(1) - 0.006).abs() < 1e-12);
        assert!((base_speed(10) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_tier_mix_boundaries() {
        assert_eq!(tiers_for_level(1), &[Tier::Easy]);
        assert_eq!(tiers_for_level(3), &[Tier::Easy]);
        assert_eq!(tiers_for_level(4), &[Tier::Easy, Tier::Medium]);
        assert_eq!(tiers_for_level(7), &[Tier::Easy, Tier::Medium]);
        assert_eq!(tiers_for_level(8), &[Tier::Medium, Tier::Hard]);
        assert_eq!(tiers_for_level(10), &[Tier::Medium, Tier::Hard]);
    }

    #[test]
    fn test_progression_clamps_out_of_range() {
        let prog = LevelProgression::new(vec!["a", "b", "c"]).unwrap();
        assert_eq!(prog.max_level(), 3);
        assert_eq!(*prog.tier_for(0), "a");
        assert_eq!(*prog.tier_for(1), "a");
        assert_eq!(*prog.tier_for(3), "c");
        assert_eq!(*prog.tier_for(99), "c");
        assert_eq!(prog.state(42).level, 3);
    }

    #[test]
    fn test_progression_rejects_empty() {
        let err = LevelProgression::<String>::new(Vec::new()).unwrap_err();
        assert_eq!(err, ContentError::NoTiers);
    }

    #[test]
    fn test_arcade_ladder() {
        let prog = LevelProgression::arcade(DEFAULT_ARCADE_LEVELS);
        assert_eq!(prog.max_level(), 10);
        assert_eq!(prog.tier_for(5).level, 5);
        assert_eq!(prog.tier_for(11).tiers, &[Tier::Medium, Tier::Hard]);
        // Degenerate config still yields one level
        assert_eq!(LevelProgression::arcade(0).max_level(), 1);
    }
}
