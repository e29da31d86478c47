use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "typed", rename_all = "lowercase")]
pub enum CharStatus {
    Correct,
    Incorrect(char),
}

impl CharStatus {
    pub fn is_correct(self) -> bool {
        matches!(self, CharStatus::Correct)
    }
}

/// Characters a text session accepts: anything printable. Control keys
/// (enter, tab, escape, ...) are the host's business.
pub fn text_char(ch: char) -> Option<char> {
    if ch.is_control() { None } else { Some(ch) }
}

/// Characters the falling-word pool accepts: single ASCII letters,
/// compared case-insensitively.
pub fn arcade_char(ch: char) -> Option<char> {
    ch.is_ascii_alphabetic().then(|| ch.to_ascii_lowercase())
}
