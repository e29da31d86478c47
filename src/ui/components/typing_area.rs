use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use keychase::session::input::CharStatus;
use keychase::session::practice::PracticeView;

use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    view: &'a PracticeView,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(view: &'a PracticeView, title: &'a str, theme: &'a Theme) -> Self {
        Self { view, title, theme }
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let typed: Vec<char> = self.view.typed.chars().collect();
        let cursor = typed.len();

        let mut spans: Vec<Span> = Vec::new();
        for (idx, ch) in self.view.target.chars().enumerate() {
            let span = match self.view.marks.get(idx) {
                Some(CharStatus::Correct) => {
                    Span::styled(ch.to_string(), Style::default().fg(colors.text_correct()))
                }
                // show what was typed, not what was expected
                Some(CharStatus::Incorrect(actual)) => Span::styled(
                    visible(*actual).to_string(),
                    Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                ),
                None if idx == cursor => Span::styled(
                    ch.to_string(),
                    Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                ),
                None => Span::styled(ch.to_string(), Style::default().fg(colors.text_pending())),
            };
            spans.push(span);
        }

        // input that runs past the end of the target
        for &extra in typed.iter().skip(self.view.target.chars().count()) {
            spans.push(Span::styled(
                visible(extra).to_string(),
                Style::default()
                    .fg(colors.text_incorrect())
                    .bg(colors.text_incorrect_bg()),
            ));
        }

        let border = if self.view.metrics.completed {
            colors.success()
        } else {
            colors.border_focused()
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

fn visible(ch: char) -> char {
    if ch == ' ' { '\u{00b7}' } else { ch }
}
