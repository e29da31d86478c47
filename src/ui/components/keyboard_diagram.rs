use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Widget};

use keychase::app::KeyHint;
use keychase::keyboard::finger::{self, Finger, Hand};
use keychase::keyboard::layout::{self, QWERTY_ROWS, ROW_STAGGER};

use crate::ui::theme::Theme;

pub struct KeyboardDiagram<'a> {
    pub hint: Option<KeyHint>,
    /// Keys the current lesson drills.
    pub focus_keys: &'a [String],
    pub show_fingers: bool,
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        hint: Option<KeyHint>,
        focus_keys: &'a [String],
        show_fingers: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            hint,
            focus_keys,
            show_fingers,
            theme,
        }
    }

    fn is_focus(&self, key: char) -> bool {
        self.focus_keys
            .iter()
            .any(|k| k.chars().count() == 1 && k.starts_with(key))
    }
}

fn finger_color(ch: char) -> Color {
    let Some(assignment) = finger::qwerty_finger(ch) else {
        return Color::Rgb(120, 120, 120);
    };
    match (assignment.hand, assignment.finger) {
        (_, Finger::Pinky) => Color::Rgb(180, 100, 100),
        (_, Finger::Ring) => Color::Rgb(180, 140, 80),
        (_, Finger::Middle) => Color::Rgb(120, 160, 80),
        (Hand::Left, Finger::Index) => Color::Rgb(80, 140, 180),
        (Hand::Right, Finger::Index) => Color::Rgb(100, 140, 200),
        (_, Finger::Thumb) => Color::Rgb(140, 120, 180),
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.hint.and_then(|h| h.finger.map(|f| (h, f))) {
            Some((hint, assignment)) if self.show_fingers => {
                let shift = if hint.shift { " + shift" } else { "" };
                format!(" Next: {} ({}{shift}) ", key_name(hint.key), assignment.label())
            }
            _ => " Keyboard ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < QWERTY_ROWS.len() as u16 || inner.width < 30 {
            return;
        }

        let key_width: u16 = if inner.width >= 13 * 5 + 6 { 5 } else { 4 };
        let next = self.hint.map(|h| finger::base_key(h.key));
        let next_pos = self.hint.and_then(|h| layout::position_of(h.key));

        for (row_idx, row) in QWERTY_ROWS.iter().enumerate() {
            let y = inner.y + row_idx as u16;
            let offset = ROW_STAGGER.get(row_idx).copied().unwrap_or(0) * key_width / 2;

            for (col_idx, &key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * key_width;
                if x + key_width > inner.x + inner.width {
                    break;
                }

                let style = if next_pos == Some((row_idx, col_idx)) {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else if self.is_focus(key) {
                    Style::default().fg(colors.bg()).bg(colors.focused_key())
                } else if self.show_fingers {
                    Style::default().fg(colors.fg()).bg(finger_color(key))
                } else {
                    Style::default().fg(colors.text_pending()).bg(colors.bg())
                };

                let display = if key_width == 5 {
                    format!("[ {key} ]")
                } else {
                    format!("[{key}] ")
                };
                buf.set_stringn(x, y, &display, key_width as usize, style);
            }
        }

        let space_y = inner.y + QWERTY_ROWS.len() as u16;
        if space_y < inner.y + inner.height {
            let width = (key_width * 6).min(inner.width);
            let x = inner.x + (inner.width - width) / 2;
            let style = if next == Some(' ') {
                Style::default().fg(colors.bg()).bg(colors.accent())
            } else {
                Style::default().fg(colors.text_pending()).bg(colors.bg())
            };
            buf.set_stringn(x, space_y, format!("[{:^w$}]", "space", w = width as usize - 2), width as usize, style);
        }
    }
}

fn key_name(key: char) -> String {
    match key {
        ' ' => "space".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_hint_highlights_its_base_key() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 7);
        let mut buf = Buffer::empty(area);
        KeyboardDiagram::new(Some(KeyHint::for_char('A')), &[], false, &theme).render(area, &mut buf);

        // home row starts two half-keys in; 'a' is its first key
        assert_eq!(buf[(6, 3)].bg, theme.colors.accent());
        assert_eq!(buf[(11, 3)].bg, theme.colors.bg());
    }
}
