use thiserror::Error;

use crate::engine::level::Tier;

/// Content that cannot drive a session. Raised once, when content is loaded,
/// so that sessions themselves never fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("level progression needs at least one tier")]
    NoTiers,

    #[error("word tier {0:?} is empty")]
    EmptyWordTier(Tier),

    #[error("word {word:?} in tier {tier:?} must be non-empty ASCII letters")]
    InvalidWord { tier: Tier, word: String },

    #[error("word {0:?} cannot be typed with letter keys")]
    UntypeableWord(String),

    #[error("practice text {index} is empty")]
    EmptyPracticeText { index: usize },

    #[error("course {course:?} has no lessons")]
    EmptyCourse { course: String },

    #[error("lesson {title:?} has an empty practice text")]
    EmptyLessonText { title: String },

    #[error("custom text is empty")]
    EmptyCustomText,

    #[error("bundled asset {0} is missing")]
    MissingAsset(String),

    #[error("could not parse {name}: {reason}")]
    Parse { name: String, reason: String },
}
