pub const POINTS_PER_KEY: u32 = 10;
pub const POINTS_PER_WORD: u32 = 50;

pub const PURSUER_START_X: f64 = -5.0;
pub const RUNNER_START_X: f64 = 5.0;
pub const PURSUER_STEP: f64 = 0.2;
pub const CATCH_DISTANCE: f64 = 1.0;
pub const RUNNER_MAX_X: f64 = 8.0;

pub fn score_for(correct_keys: u32, words_completed: u32) -> u32 {
    correct_keys * POINTS_PER_KEY + words_completed * POINTS_PER_WORD
}

/// How far the runner pulls away after a completed word. Higher levels give
/// the runner less room so the chase tightens.
pub fn escape_distance(level: u32) -> f64 {
    (0.5 - level as f64 * 0.03).max(0.1)
}

pub fn next_level(level: u32, max_level: u32) -> u32 {
    (level + 1).min(max_level)
}

/// Positions of the two chase characters on the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chase {
    pub pursuer_x: f64,
    pub runner_x: f64,
}

impl Default for Chase {
    fn default() -> Self {
        Self {
            pursuer_x: PURSUER_START_X,
            runner_x: RUNNER_START_X,
        }
    }
}

impl Chase {
    /// Step the pursuer forward. Returns true once the runner is caught.
    pub fn advance_pursuer(&mut self) -> bool {
        self.pursuer_x += PURSUER_STEP;
        self.is_caught()
    }

    pub fn runner_escapes(&mut self, level: u32) {
        self.runner_x = (self.runner_x + escape_distance(level)).min(RUNNER_MAX_X);
    }

    pub fn is_caught(&self) -> bool {
        self.pursuer_x + CATCH_DISTANCE >= self.runner_x
    }

    /// Remaining gap as a fraction of the starting gap, for progress bars.
    pub fn closed_ratio(&self) -> f64 {
        let start_gap = RUNNER_START_X - PURSUER_START_X - CATCH_DISTANCE;
        let gap = (self.runner_x - self.pursuer_x - CATCH_DISTANCE).max(0.0);
        (1.0 - gap / start_gap).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_weights_words_higher() {
        assert_eq!(score_for(0, 0), 0);
        assert_eq!(score_for(3, 0), 30);
        assert_eq!(score_for(3, 1), 80);
    }

    #[test]
    fn test_escape_distance_shrinks_to_floor() {
        assert!((escape_distance(1) - 0.47).abs() < 1e-9);
        assert!(escape_distance(10) < escape_distance(1));
        assert!((escape_distance(50) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_next_level_caps() {
        assert_eq!(next_level(1, 10), 2);
        assert_eq!(next_level(10, 10), 10);
    }

    #[test]
    fn test_chase_catch_after_enough_keys() {
        let mut chase = Chase::default();
        // gap 10 minus catch distance 1 = 9, at 0.2 per key -> ~45 keys
        let mut steps = 1;
        while !chase.advance_pursuer() {
            steps += 1;
            assert!(steps < 100);
        }
        assert!((45..=46).contains(&steps), "caught after {steps}");
        assert!((chase.closed_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_runner_capped_at_edge() {
        let mut chase = Chase::default();
        for _ in 0..100 {
            chase.runner_escapes(1);
        }
        assert!((chase.runner_x - RUNNER_MAX_X).abs() < 1e-9);
        assert_eq!(Chase::default().closed_ratio(), 0.0);
    }
}
