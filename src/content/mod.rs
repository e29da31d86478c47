pub mod bundled;

use serde::{Deserialize, Serialize};

use crate::engine::level::{LevelProgression, Tier};
use crate::error::ContentError;

pub use bundled::Content;

/// Arcade vocabulary bucketed by difficulty. Every word must be typeable with
/// letter keys alone, since the pool ignores every other key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTiers {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl WordTiers {
    pub fn new(
        easy: Vec<String>,
        medium: Vec<String>,
        hard: Vec<String>,
    ) -> Result<Self, ContentError> {
        let tiers = Self { easy, medium, hard };
        tiers.validate()?;
        Ok(tiers)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        for tier in Tier::ALL {
            let words = self.words(tier);
            if words.is_empty() {
                return Err(ContentError::EmptyWordTier(tier));
            }
            if let Some(bad) = words.iter().find(|w| !is_arcade_word(w)) {
                return Err(ContentError::InvalidWord {
                    tier,
                    word: bad.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn words(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }

    /// Number of candidate words across a tier mix.
    pub fn pool_len(&self, tiers: &[Tier]) -> usize {
        tiers.iter().map(|&t| self.words(t).len()).sum()
    }

    /// The `idx`-th word across a tier mix, in tier order.
    pub fn pick(&self, tiers: &[Tier], mut idx: usize) -> Option<&str> {
        for &tier in tiers {
            let words = self.words(tier);
            if idx < words.len() {
                return Some(&words[idx]);
            }
            idx -= words.len();
        }
        None
    }
}

pub fn is_arcade_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tips: Vec<String>,
    pub text: String,
    /// Keys the lesson drills, for highlighting. May name modifier keys.
    #[serde(default)]
    pub focus_keys: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.lessons.is_empty() {
            return Err(ContentError::EmptyCourse {
                course: self.title.clone(),
            });
        }
        if let Some(lesson) = self.lessons.iter().find(|l| l.text.trim().is_empty()) {
            return Err(ContentError::EmptyLessonText {
                title: lesson.title.clone(),
            });
        }
        Ok(())
    }

    pub fn progression(&self) -> Result<LevelProgression<Lesson>, ContentError> {
        LevelProgression::new(self.lessons.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseKind {
    Basic,
    Advanced,
}

/// Where sessions get their texts and words from.
pub trait ContentProvider {
    fn practice_texts(&self) -> &[String];
    fn word_tiers(&self) -> &WordTiers;
    fn course(&self, kind: CourseKind) -> &Course;

    fn practice_progression(&self) -> Result<LevelProgression<String>, ContentError> {
        LevelProgression::new(self.practice_texts().to_vec())
    }
}

#[cfg(test)]
pub(crate) fn test_tiers() -> WordTiers {
    let owned = |ws: &[&str]| ws.iter().map(|w| w.to_string()).collect::<Vec<_>>();
    WordTiers::new(
        owned(&["run", "go", "see"]),
        owned(&["police", "thief"]),
        owned(&["surveillance"]),
    )
    .unwrap()
}
