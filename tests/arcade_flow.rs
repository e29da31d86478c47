use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use keychase::app::{App, AppScreen};
use keychase::config::{ArcadeConfig, Config};
use keychase::content::{Content, ContentProvider};
use keychase::engine::level::Tier;
use keychase::session::result::SessionSummary;
use keychase::session::{Listener, SessionEvent};

#[derive(Default)]
struct Counts {
    correct: u32,
    completed: Vec<String>,
    escaped: Vec<String>,
    levels: Vec<u32>,
    finished: u32,
}

struct Counter(Rc<RefCell<Counts>>);

impl Listener for Counter {
    fn on_correct_key(&mut self) {
        self.0.borrow_mut().correct += 1;
    }

    fn on_word_complete(&mut self, text: &str) {
        self.0.borrow_mut().completed.push(text.to_string());
    }

    fn on_word_escaped(&mut self, text: &str) {
        self.0.borrow_mut().escaped.push(text.to_string());
    }

    fn on_level_changed(&mut self, level: u32) {
        self.0.borrow_mut().levels.push(level);
    }

    fn on_session_complete(&mut self, _summary: &SessionSummary) {
        self.0.borrow_mut().finished += 1;
    }
}

fn chase(time_limit_secs: u32) -> (App, Rc<RefCell<Counts>>) {
    let config = Config {
        arcade: ArcadeConfig {
            time_limit_secs,
            start_level: 1,
            max_level: 10,
        },
        ..Config::default()
    };
    let mut app = App::new(config, Content::bundled().unwrap());
    let counts = Rc::new(RefCell::new(Counts::default()));
    app.subscribe(Box::new(Counter(Rc::clone(&counts))));
    app.start_arcade_with_rng(SmallRng::seed_from_u64(11));
    (app, counts)
}

fn type_str(app: &mut App, s: &str) -> Vec<SessionEvent> {
    s.chars().flat_map(|ch| app.submit_keystroke(ch)).collect()
}

#[test]
fn typed_word_reaches_listeners() {
    let (mut app, counts) = chase(60);
    app.arcade_mut()
        .unwrap()
        .pool_mut()
        .insert_word("police", 0.0, 4.0, 0.0)
        .unwrap();

    // uppercase is folded, digits never match
    type_str(&mut app, "PO7");
    assert_eq!(counts.borrow().correct, 2);
    assert_eq!(app.snapshot().hint.unwrap().key, 'l');

    type_str(&mut app, "lice");
    let counts = counts.borrow();
    assert_eq!(counts.correct, 6);
    assert_eq!(counts.completed, vec!["police".to_string()]);
    assert_eq!(counts.levels, vec![2]);

    let snap = app.snapshot();
    assert_eq!(snap.mode, AppScreen::Arcade);
    assert_eq!(snap.level, 2);
    assert_eq!(snap.arcade.unwrap().score, 6 * 10 + 50);
    assert!(snap.words.is_empty());
}

#[test]
fn falling_word_escapes_once() {
    let (mut app, counts) = chase(60);
    app.arcade_mut()
        .unwrap()
        .pool_mut()
        .insert_word("thief", 2.0, -1.9, 0.6)
        .unwrap();

    let events = app.tick(0.1);
    assert_eq!(
        events,
        vec![SessionEvent::WordEscaped {
            text: "thief".to_string()
        }]
    );
    // still drawn while it leaves, but no longer typeable
    let snap = app.snapshot();
    assert_eq!(snap.words.len(), 1);
    assert!(snap.words[0].escaped);
    assert!(snap.hint.is_none());

    assert!(app.tick(0.2).is_empty());
    assert!(app.snapshot().words.is_empty());
    assert_eq!(counts.borrow().escaped, vec!["thief".to_string()]);
    assert_eq!(app.snapshot().arcade.unwrap().words_missed, 1);
}

#[test]
fn running_out_of_time_shows_results() {
    let (mut app, counts) = chase(3);
    app.tick(1.0);
    app.tick(2.0);
    assert_eq!(app.screen, AppScreen::Arcade);
    assert_eq!(app.snapshot().arcade.unwrap().time_left, 1);

    let events = app.tick(3.0);
    assert!(matches!(
        events.last(),
        Some(SessionEvent::SessionComplete(SessionSummary::Arcade(s))) if !s.won
    ));
    assert_eq!(app.screen, AppScreen::Results);
    assert_eq!(counts.borrow().finished, 1);
    assert_eq!(app.arcade().unwrap().pending_timers(), 0);

    // the finished game ignores further input
    assert!(app.submit_keystroke('a').is_empty());
    assert!(app.tick(10.0).is_empty());
}

#[test]
fn catching_the_runner_wins() {
    let (mut app, counts) = chase(600);
    app.arcade_mut()
        .unwrap()
        .pool_mut()
        .insert_word(&"s".repeat(60), 0.0, 4.0, 0.0)
        .unwrap();

    for _ in 0..60 {
        app.submit_keystroke('s');
        if app.screen == AppScreen::Results {
            break;
        }
    }

    assert_eq!(app.screen, AppScreen::Results);
    match app.last_summary() {
        Some(SessionSummary::Arcade(summary)) => {
            assert!(summary.won);
            assert_eq!(summary.words_completed, 0);
        }
        other => panic!("expected an arcade summary, got {other:?}"),
    }
    assert_eq!(counts.borrow().finished, 1);
}

#[test]
fn retry_after_results_starts_a_fresh_chase() {
    let (mut app, _) = chase(1);
    app.tick(1.0);
    assert_eq!(app.screen, AppScreen::Results);

    app.restart();
    assert_eq!(app.screen, AppScreen::Arcade);
    let view = app.snapshot().arcade.unwrap();
    assert_eq!(view.time_left, 1);
    assert_eq!(view.score, 0);
    assert_eq!(app.arcade().unwrap().pending_timers(), 1);
}

#[test]
fn menu_tears_the_chase_down() {
    let (mut app, counts) = chase(60);
    app.tick(6.0);
    app.go_to_menu();

    assert!(app.arcade().is_none());
    assert!(app.tick(100.0).is_empty());
    assert_eq!(counts.borrow().finished, 0);
    assert!(app.snapshot().words.is_empty());
}

#[test]
fn spawned_words_come_from_the_easy_tier_at_level_one() {
    let (mut app, _) = chase(600);
    let easy: Vec<String> = app
        .content()
        .word_tiers()
        .words(Tier::Easy)
        .to_vec();

    for step in 1..=40 {
        app.tick(step as f64 * 0.5);
    }
    let words = app.snapshot().words;
    assert!(!words.is_empty());
    assert!(words.iter().all(|w| easy.contains(&w.text)));
}
