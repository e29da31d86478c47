use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::practice::PracticeSession;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeSummary {
    /// "practice", "custom" or the tutorial course name.
    pub mode: String,
    pub level: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub error_count: u32,
    pub total_chars: usize,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
}

impl PracticeSummary {
    pub fn from_session(session: &PracticeSession, mode: &str, level: u32) -> Self {
        Self {
            mode: mode.to_string(),
            level,
            wpm: session.wpm(),
            accuracy: session.accuracy(),
            error_count: session.error_count(),
            total_chars: session.target().len(),
            elapsed_secs: session.elapsed_secs(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcadeSummary {
    pub won: bool,
    pub score: u32,
    pub level: u32,
    pub correct_keys: u32,
    pub words_completed: u32,
    /// Words that fell out of the field untyped.
    pub words_missed: u32,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
}

impl ArcadeSummary {
    pub fn hit_rate(&self) -> f64 {
        let seen = self.words_completed + self.words_missed;
        if seen == 0 {
            return 0.0;
        }
        self.words_completed as f64 / seen as f64 * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionSummary {
    Practice(PracticeSummary),
    Arcade(ArcadeSummary),
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_summary_from_completed_session() {
        let t0 = Instant::now();
        let mut session = PracticeSession::new("go on");
        for (i, ch) in "go on".chars().enumerate() {
            session.push(ch, t0 + Duration::from_secs(i as u64));
        }

        let summary = PracticeSummary::from_session(&session, "practice", 3);
        assert_eq!(summary.level, 3);
        assert_eq!(summary.total_chars, 5);
        assert_eq!(summary.accuracy, 100);
        assert_eq!(summary.error_count, 0);
        assert!((summary.elapsed_secs - 4.0).abs() < 1e-9);
        // 2 words in 4 seconds
        assert_eq!(summary.wpm, 30);
    }

    #[test]
    fn test_hit_rate() {
        let mut summary = ArcadeSummary {
            won: false,
            score: 0,
            level: 1,
            correct_keys: 0,
            words_completed: 0,
            words_missed: 0,
            elapsed_secs: 60.0,
            timestamp: Utc::now(),
        };
        assert_eq!(summary.hit_rate(), 0.0);
        summary.words_completed = 3;
        summary.words_missed = 1;
        assert!((summary.hit_rate() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_json_is_tagged() {
        let summary = SessionSummary::Arcade(ArcadeSummary {
            won: true,
            score: 120,
            level: 2,
            correct_keys: 7,
            words_completed: 1,
            words_missed: 0,
            elapsed_secs: 12.5,
            timestamp: Utc::now(),
        });
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["kind"], "arcade");
        assert_eq!(json["won"], true);
        assert_eq!(json["score"], 120);
    }
}
