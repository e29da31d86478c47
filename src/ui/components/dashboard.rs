use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keychase::session::result::{ArcadeSummary, PracticeSummary, SessionSummary};

use crate::ui::theme::{Theme, ThemeColors};

/// Results screen for a finished practice text or chase.
pub struct Dashboard<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

fn stat_line<'s>(label: &'s str, value: String, color: Color, colors: &ThemeColors) -> Line<'s> {
    Line::from(vec![
        Span::styled(format!("  {label:<10}"), Style::default().fg(colors.fg())),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn accuracy_color(accuracy: u32, colors: &ThemeColors) -> Color {
    if accuracy >= 95 {
        colors.success()
    } else if accuracy >= 85 {
        colors.warning()
    } else {
        colors.error()
    }
}

fn practice_lines(s: &PracticeSummary, colors: &ThemeColors) -> Vec<Line<'static>> {
    vec![
        stat_line("Speed:", format!("{} WPM", s.wpm), colors.accent(), colors),
        stat_line(
            "Accuracy:",
            format!("{}%", s.accuracy),
            accuracy_color(s.accuracy, colors),
            colors,
        ),
        stat_line("Time:", format!("{:.1}s", s.elapsed_secs), colors.fg(), colors),
        stat_line(
            "Errors:",
            s.error_count.to_string(),
            if s.error_count == 0 {
                colors.success()
            } else {
                colors.error()
            },
            colors,
        ),
        stat_line("Level:", s.level.to_string(), colors.fg(), colors),
    ]
}

fn arcade_lines(s: &ArcadeSummary, colors: &ThemeColors) -> Vec<Line<'static>> {
    vec![
        stat_line("Score:", s.score.to_string(), colors.accent(), colors),
        stat_line("Level:", s.level.to_string(), colors.fg(), colors),
        stat_line(
            "Words:",
            format!("{} typed, {} missed", s.words_completed, s.words_missed),
            colors.fg(),
            colors,
        ),
        stat_line("Hit rate:", format!("{:.0}%", s.hit_rate()), colors.fg(), colors),
        stat_line("Time:", format!("{:.1}s", s.elapsed_secs), colors.fg(), colors),
    ]
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (title, headline, headline_color, lines) = match self.summary {
            SessionSummary::Practice(s) => (
                " Practice Complete ",
                "Results",
                colors.accent(),
                practice_lines(s, colors),
            ),
            SessionSummary::Arcade(s) if s.won => (
                " Chase Over ",
                "Caught the runner!",
                colors.success(),
                arcade_lines(s, colors),
            ),
            SessionSummary::Arcade(s) => (
                " Chase Over ",
                "Time's up, the runner got away",
                colors.error(),
                arcade_lines(s, colors),
            ),
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(lines.len() as u16 * 2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            headline,
            Style::default()
                .fg(headline_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let spaced: Vec<Line> = lines
            .into_iter()
            .flat_map(|line| [line, Line::from("")])
            .collect();
        Paragraph::new(spaced).render(layout[1], buf);

        let mut help = vec![Span::styled("  [r] Retry  ", Style::default().fg(colors.accent()))];
        if matches!(self.summary, SessionSummary::Practice(_)) {
            help.push(Span::styled("[n/Enter] Next level  ", Style::default().fg(colors.accent())));
        }
        help.push(Span::styled("[q/Esc] Menu", Style::default().fg(colors.accent())));
        Paragraph::new(Line::from(help)).render(layout[3], buf);
    }
}
