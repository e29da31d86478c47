use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::Context;
use rust_embed::Embed;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ContentProvider, Course, CourseKind, WordTiers};
use crate::error::ContentError;

pub const WORDS_FILE: &str = "words.json";
pub const PRACTICE_FILE: &str = "practice.toml";
pub const LESSONS_FILE: &str = "lessons.toml";

#[derive(Embed)]
#[folder = "assets/content/"]
struct ContentAssets;

#[derive(Deserialize)]
struct PracticeFile {
    texts: Vec<String>,
}

#[derive(Deserialize)]
struct LessonsFile {
    basic: Course,
    advanced: Course,
}

/// Validated texts, words and courses for every mode.
#[derive(Clone, Debug)]
pub struct Content {
    practice: Vec<String>,
    tiers: WordTiers,
    basic: Course,
    advanced: Course,
}

impl Content {
    pub fn new(
        practice: Vec<String>,
        tiers: WordTiers,
        basic: Course,
        advanced: Course,
    ) -> Result<Self, ContentError> {
        if practice.is_empty() {
            return Err(ContentError::NoTiers);
        }
        if let Some(index) = practice.iter().position(|t| t.trim().is_empty()) {
            return Err(ContentError::EmptyPracticeText { index });
        }
        tiers.validate()?;
        basic.validate()?;
        advanced.validate()?;
        Ok(Self {
            practice,
            tiers,
            basic,
            advanced,
        })
    }

    /// Content compiled into the binary.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_sources(
            &bundled_source(WORDS_FILE)?,
            &bundled_source(PRACTICE_FILE)?,
            &bundled_source(LESSONS_FILE)?,
        )
    }

    /// Bundled content with any file present in `dir` taking its place.
    pub fn load(dir: Option<&Path>) -> anyhow::Result<Self> {
        let words = read_source(dir, WORDS_FILE)?;
        let practice = read_source(dir, PRACTICE_FILE)?;
        let lessons = read_source(dir, LESSONS_FILE)?;
        Ok(Self::from_sources(&words, &practice, &lessons)?)
    }

    pub fn from_sources(
        words_json: &str,
        practice_toml: &str,
        lessons_toml: &str,
    ) -> Result<Self, ContentError> {
        let tiers: WordTiers =
            serde_json::from_str(words_json).map_err(|e| parse_error(WORDS_FILE, e))?;
        let practice: PracticeFile =
            toml::from_str(practice_toml).map_err(|e| parse_error(PRACTICE_FILE, e))?;
        let lessons: LessonsFile =
            toml::from_str(lessons_toml).map_err(|e| parse_error(LESSONS_FILE, e))?;
        Self::new(practice.texts, tiers, lessons.basic, lessons.advanced)
    }
}

impl ContentProvider for Content {
    fn practice_texts(&self) -> &[String] {
        &self.practice
    }

    fn word_tiers(&self) -> &WordTiers {
        &self.tiers
    }

    fn course(&self, kind: CourseKind) -> &Course {
        match kind {
            CourseKind::Basic => &self.basic,
            CourseKind::Advanced => &self.advanced,
        }
    }
}

fn parse_error(name: &str, err: impl std::fmt::Display) -> ContentError {
    ContentError::Parse {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

fn bundled_source(name: &str) -> Result<Cow<'static, str>, ContentError> {
    let file = ContentAssets::get(name).ok_or_else(|| ContentError::MissingAsset(name.to_string()))?;
    match file.data {
        Cow::Borrowed(bytes) => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| parse_error(name, e)),
        Cow::Owned(bytes) => String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|e| parse_error(name, e)),
    }
}

fn read_source(dir: Option<&Path>, name: &str) -> anyhow::Result<Cow<'static, str>> {
    if let Some(dir) = dir {
        let path = dir.join(name);
        if path.is_file() {
            info!(path = %path.display(), "using user content file");
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(Cow::Owned(text));
        }
        debug!(file = name, "no override, using bundled copy");
    }
    Ok(bundled_source(name)?)
}
