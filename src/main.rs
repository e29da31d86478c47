mod event;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use keychase::app::{App, AppScreen, MENU, Snapshot};
use keychase::config::Config;
use keychase::session::Listener;
use keychase::session::arcade::ArcadeState;

use event::{AppEvent, EventHandler};
use ui::components::dashboard::Dashboard;
use ui::components::keyboard_diagram::KeyboardDiagram;
use ui::components::menu::Menu;
use ui::components::progress_bar::ProgressBar;
use ui::components::typing_area::TypingArea;
use ui::components::word_field::WordField;
use ui::layout::ScreenLayout;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "keychase", version, about = "Terminal typing practice and falling-word chase")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Practice level to start at")]
    level: Option<u32>,

    #[arg(long, help = "Chase time limit in seconds")]
    time_limit: Option<u32>,

    #[arg(long, help = "Chase starting level")]
    start_level: Option<u32>,

    #[arg(long, help = "Directory with words.json, practice.toml or lessons.toml overrides")]
    content_dir: Option<PathBuf>,

    #[arg(long, value_name = "TEXT", help = "Practice TEXT instead of the bundled texts")]
    custom: Option<String>,

    #[arg(
        long,
        value_name = "TEXT",
        help = "Type TEXT into a headless practice session and print the snapshot as JSON"
    )]
    replay: Option<String>,

    #[arg(long, help = "Write the effective configuration to the config file and exit")]
    write_config: bool,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(level) = self.level {
            config.practice_level = level;
        }
        if let Some(secs) = self.time_limit {
            config.arcade.time_limit_secs = secs;
        }
        if let Some(level) = self.start_level {
            config.arcade.start_level = level;
        }
        if let Some(dir) = &self.content_dir {
            config.content_dir = Some(dir.clone());
        }
        config.normalize();
    }
}

/// Rings the terminal bell when a falling word is typed or lost.
struct Bell;

impl Bell {
    fn ring() {
        let mut out = io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

impl Listener for Bell {
    fn on_word_complete(&mut self, _text: &str) {
        Self::ring();
    }

    fn on_word_escaped(&mut self, _text: &str) {
        Self::ring();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load()?;
    cli.apply(&mut config);

    if cli.write_config {
        config.save()?;
        println!("{}", Config::config_path().display());
        return Ok(());
    }

    let mut app = App::from_config(config)?;

    if let Some(text) = &cli.replay {
        return replay(&mut app, text);
    }

    if let Some(text) = &cli.custom {
        app.start_custom(text)?;
    }
    if app.config.bell {
        app.subscribe(Box::new(Bell));
    }
    let theme = Theme::load(&app.config.theme).unwrap_or_default();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(app.config.tick_rate_ms));

    let result = run_app(&mut terminal, &mut app, &theme, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn replay(app: &mut App, text: &str) -> Result<()> {
    app.start_custom(text).context("cannot replay this text")?;
    for ch in text.chars() {
        app.submit_keystroke(ch);
    }
    println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
    events: &EventHandler,
) -> Result<()> {
    let start = Instant::now();
    loop {
        app.tick(start.elapsed().as_secs_f64());
        terminal.draw(|frame| render(frame, app, theme))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key)?,
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => terminal.autoresize()?,
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key)?,
        AppScreen::Practice | AppScreen::Tutorial => handle_typing_key(app, key),
        AppScreen::Arcade => handle_arcade_key(app, key),
        AppScreen::Results => handle_result_key(app, key),
    }
    Ok(())
}

fn handle_menu_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.activate_menu(app.menu_selected)?,
        KeyCode::Char(ch) => {
            if let Some(index) = MENU.iter().position(|entry| entry.key == ch) {
                app.menu_selected = index;
                app.activate_menu(index)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Backspace => {
            app.backspace();
        }
        KeyCode::Tab if app.screen == AppScreen::Tutorial => app.next_level(),
        KeyCode::Char(ch) => {
            app.submit_keystroke(ch);
        }
        _ => {}
    }
}

fn handle_arcade_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char(ch) => {
            app.submit_keystroke(ch);
        }
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char('n') | KeyCode::Enter => app.next_level(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    let bg = Block::default().style(Style::default().bg(theme.colors.bg()));
    frame.render_widget(bg, area);

    let snap = app.snapshot();
    match snap.mode {
        AppScreen::Menu => render_menu(frame, app, theme),
        AppScreen::Practice | AppScreen::Tutorial => render_typing(frame, app, &snap, theme),
        AppScreen::Arcade => render_arcade(frame, &snap, theme),
        AppScreen::Results => render_result(frame, &snap, theme),
    }
}

fn header<'a>(title: &'a str, info: String, theme: &Theme) -> Paragraph<'a> {
    let colors = &theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

fn footer<'a>(text: &'a str, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(theme.colors.text_pending()),
    )))
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, theme: &Theme) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let info = format!(
        " | practice level {} | chase {}s ",
        app.config.practice_level, app.config.arcade.time_limit_secs
    );
    frame.render_widget(header(" keychase ", info, theme), layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(Menu::new(MENU, app.menu_selected, theme), menu_area);

    frame.render_widget(
        footer(" [1-4] Start  [j/k] Move  [Enter] Select  [q] Quit ", theme),
        layout[2],
    );
}

fn render_typing(frame: &mut ratatui::Frame, app: &App, snap: &Snapshot, theme: &Theme) {
    let Some(practice) = &snap.practice else {
        return;
    };
    let area = frame.area();
    let screen = ScreenLayout::new(area);

    let (title, info, progress_label, footer_text) = match &snap.lesson {
        Some(lesson) if snap.mode == AppScreen::Tutorial => (
            " Tutorial ",
            format!(
                " | {} ({}/{}) | WPM {} | Acc {}% ",
                lesson.title,
                lesson.index + 1,
                lesson.count,
                practice.metrics.wpm,
                practice.metrics.accuracy
            ),
            if lesson.advance_pending {
                "Next lesson...".to_string()
            } else {
                "Lesson".to_string()
            },
            " [Esc] Menu  [Tab] Skip lesson  [Backspace] Delete ",
        ),
        _ => {
            let max = app.practice().map_or(snap.level, |run| run.max_level());
            (
                " Practice ",
                format!(
                    " | Level {}/{} | WPM {} | Acc {}% | Errors {} ",
                    snap.level,
                    max,
                    practice.metrics.wpm,
                    practice.metrics.accuracy,
                    practice.metrics.error_count
                ),
                "Progress".to_string(),
                " [Esc] Menu  [Backspace] Delete ",
            )
        }
    };
    frame.render_widget(header(title, info, theme), screen.header);

    let show_kbd = screen.tier.show_keyboard(area.height, true);
    let mut constraints = vec![Constraint::Min(5), Constraint::Length(3)];
    if show_kbd {
        constraints.push(Constraint::Length(7));
    }
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(screen.main);

    let text_title = snap
        .lesson
        .as_ref()
        .filter(|_| snap.mode == AppScreen::Tutorial)
        .map_or(" Text ", |_| " Lesson ");
    frame.render_widget(TypingArea::new(practice, text_title, theme), main[0]);
    frame.render_widget(
        ProgressBar::new(&progress_label, practice.progress, theme),
        main[1],
    );

    let no_focus = Vec::new();
    let focus_keys = snap
        .lesson
        .as_ref()
        .filter(|_| snap.mode == AppScreen::Tutorial)
        .map_or(&no_focus, |l| &l.focus_keys);
    if show_kbd {
        frame.render_widget(
            KeyboardDiagram::new(snap.hint, focus_keys, app.config.show_fingers, theme),
            main[2],
        );
    }

    if let Some(side) = screen.side {
        render_side_panel(frame, side, snap, theme);
    }

    frame.render_widget(footer(footer_text, theme), screen.footer);
}

fn render_side_panel(frame: &mut ratatui::Frame, area: Rect, snap: &Snapshot, theme: &Theme) {
    let colors = &theme.colors;
    let mut lines = Vec::new();

    match &snap.lesson {
        Some(lesson) if snap.mode == AppScreen::Tutorial => {
            lines.push(Line::from(Span::styled(
                lesson.summary.clone(),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(""));
            for tip in &lesson.tips {
                lines.push(Line::from(vec![
                    Span::styled("* ", Style::default().fg(colors.accent())),
                    Span::styled(tip.clone(), Style::default().fg(colors.text_pending())),
                ]));
            }
        }
        _ => {
            if let Some(practice) = &snap.practice {
                let m = &practice.metrics;
                for (label, value) in [
                    ("Level", snap.level.to_string()),
                    ("WPM", m.wpm.to_string()),
                    ("Accuracy", format!("{}%", m.accuracy)),
                    ("Errors", m.error_count.to_string()),
                ] {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{label:<10}"), Style::default().fg(colors.fg())),
                        Span::styled(
                            value,
                            Style::default()
                                .fg(colors.accent())
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]));
                }
            }
        }
    }

    let block = Block::bordered()
        .title(" Info ")
        .border_style(Style::default().fg(colors.border()));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_arcade(frame: &mut ratatui::Frame, snap: &Snapshot, theme: &Theme) {
    let Some(arcade) = &snap.arcade else {
        return;
    };
    let area = frame.area();
    let colors = &theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let status = match arcade.state {
        ArcadeState::Ready => "ready",
        ArcadeState::Running => "running",
        ArcadeState::Over { won: true } => "caught",
        ArcadeState::Over { won: false } => "escaped",
    };
    let info = format!(
        " | Level {}/{} | Score {} | {}s left | {status} ",
        arcade.level, arcade.max_level, arcade.score, arcade.time_left
    );
    frame.render_widget(header(" Chase ", info, theme), layout[0]);

    frame.render_widget(WordField::new(&snap.words, arcade, theme), layout[1]);

    let caption = format!(
        "{} typed, {} missed",
        arcade.words_completed, arcade.words_missed
    );
    frame.render_widget(
        ProgressBar::new("Closing in", arcade.closed_ratio, theme)
            .caption(caption)
            .fill(colors.warning()),
        layout[2],
    );

    frame.render_widget(footer(" [Esc] Menu  Type the lowest word ", theme), layout[3]);
}

fn render_result(frame: &mut ratatui::Frame, snap: &Snapshot, theme: &Theme) {
    if let Some(summary) = &snap.summary {
        let centered = ui::layout::centered_rect(60, 70, frame.area());
        frame.render_widget(Dashboard::new(summary, theme), centered);
    }
}
