pub mod arcade;
pub mod input;
pub mod pool;
pub mod practice;
pub mod result;
pub mod timer;
pub mod tutorial;

use crate::session::result::SessionSummary;

/// Something a session did that collaborators (sound, scoring displays,
/// persistence) may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    CorrectKey,
    WordComplete { text: String },
    WordEscaped { text: String },
    LevelChanged { level: u32 },
    LessonAdvanced { index: usize },
    SessionComplete(SessionSummary),
}

/// Receives session events. Every hook defaults to a no-op so listeners
/// only implement what they care about.
pub trait Listener {
    fn on_correct_key(&mut self) {}
    fn on_word_complete(&mut self, _text: &str) {}
    fn on_word_escaped(&mut self, _text: &str) {}
    fn on_level_changed(&mut self, _level: u32) {}
    fn on_session_complete(&mut self, _summary: &SessionSummary) {}

    fn notify(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::CorrectKey => self.on_correct_key(),
            SessionEvent::WordComplete { text } => self.on_word_complete(text),
            SessionEvent::WordEscaped { text } => self.on_word_escaped(text),
            SessionEvent::LevelChanged { level } => self.on_level_changed(*level),
            SessionEvent::LessonAdvanced { .. } => {}
            SessionEvent::SessionComplete(summary) => self.on_session_complete(summary),
        }
    }
}
