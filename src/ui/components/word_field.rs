use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use keychase::engine::scoring::RUNNER_MAX_X;
use keychase::session::arcade::ArcadeView;
use keychase::session::pool::{DESPAWN_Y, SPAWN_X_MAX, SPAWN_X_MIN, SPAWN_Y_MAX, WordView};

use crate::ui::theme::Theme;

const FIELD_TOP: f64 = SPAWN_Y_MAX;
const FIELD_BOTTOM: f64 = DESPAWN_Y;
const FIELD_LEFT: f64 = SPAWN_X_MIN - 2.0;
const FIELD_RIGHT: f64 = SPAWN_X_MAX + 2.0;

/// Falling words in their world positions, with the chase lane underneath.
pub struct WordField<'a> {
    words: &'a [WordView],
    arcade: &'a ArcadeView,
    theme: &'a Theme,
}

impl<'a> WordField<'a> {
    pub fn new(words: &'a [WordView], arcade: &'a ArcadeView, theme: &'a Theme) -> Self {
        Self {
            words,
            arcade,
            theme,
        }
    }
}

/// World coordinates to a cell inside `area`. `x` is the word's centre.
pub fn to_cell(x: f64, y: f64, area: Rect) -> (u16, u16) {
    let fx = ((x - FIELD_LEFT) / (FIELD_RIGHT - FIELD_LEFT)).clamp(0.0, 1.0);
    let fy = ((FIELD_TOP - y) / (FIELD_TOP - FIELD_BOTTOM)).clamp(0.0, 1.0);
    let col = area.x + (fx * area.width.saturating_sub(1) as f64).round() as u16;
    let row = area.y + (fy * area.height.saturating_sub(1) as f64).round() as u16;
    (col, row)
}

impl Widget for WordField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " Level {}  Score {}  {}s ",
                self.arcade.level, self.arcade.score, self.arcade.time_left
            ))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 20 {
            return;
        }
        let field = Rect::new(inner.x, inner.y, inner.width, inner.height - 2);

        // inactive words first so the active one is drawn on top
        let mut words: Vec<&WordView> = self.words.iter().collect();
        words.sort_by_key(|w| w.is_active);
        for word in words {
            let (col, row) = to_cell(word.x, word.y, field);
            let len = word.text.chars().count() as u16;
            let start = col.saturating_sub(len / 2).max(field.x);
            let max = (field.x + field.width).saturating_sub(start) as usize;

            if word.escaped {
                buf.set_stringn(start, row, &word.text, max, Style::default().fg(colors.accent_dim()));
                continue;
            }
            let (typed, rest) = word.text.split_at(word.current_index);
            let rest_style = if word.is_active {
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(colors.text_pending())
            };
            let (x, _) = buf.set_stringn(start, row, typed, max, Style::default().fg(colors.text_correct()));
            let remaining = max.saturating_sub((x - start) as usize);
            buf.set_stringn(x, row, rest, remaining, rest_style);
        }

        // chase lane
        let lane_y = inner.y + inner.height - 1;
        let lane = Rect::new(inner.x, lane_y, inner.width, 1);
        for x in lane.x..lane.x + lane.width {
            buf[(x, lane_y)].set_char('_').set_style(Style::default().fg(colors.accent_dim()));
        }
        let (pursuer, _) = to_cell(self.arcade.pursuer_x, FIELD_BOTTOM, lane);
        let (runner, _) = to_cell(self.arcade.runner_x.min(RUNNER_MAX_X), FIELD_BOTTOM, lane);
        buf[(pursuer, lane_y)]
            .set_char('P')
            .set_style(Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD));
        buf[(runner, lane_y)]
            .set_char('R')
            .set_style(Style::default().fg(colors.warning()).add_modifier(Modifier::BOLD));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_corners() {
        let area = Rect::new(2, 1, 21, 9);
        assert_eq!(to_cell(FIELD_LEFT, FIELD_TOP, area), (2, 1));
        assert_eq!(to_cell(FIELD_RIGHT, FIELD_BOTTOM, area), (22, 9));
        assert_eq!(to_cell(0.0, FIELD_TOP, area), (12, 1));
        // out of range positions stay inside the area
        assert_eq!(to_cell(100.0, -100.0, area), (22, 9));
    }
}
