use std::time::Instant;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use keychase::content::{Content, ContentProvider, WordTiers};
use keychase::engine::level::ArcadeLevel;
use keychase::session::pool::WordPool;
use keychase::session::practice::PracticeSession;

fn tiers() -> WordTiers {
    Content::bundled()
        .map(|c| c.word_tiers().clone())
        .unwrap_or_else(|err| panic!("bundled content: {err}"))
}

fn filled_pool(words: usize) -> WordPool<SmallRng> {
    let mut pool = WordPool::with_rng(tiers(), ArcadeLevel::new(10), SmallRng::seed_from_u64(7));
    for i in 0..words {
        let x = (i % 16) as f64 - 8.0;
        let y = 5.0 - (i % 7) as f64;
        pool.insert_word("surveillance", x, y, 0.0).ok();
    }
    pool
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("pool tick (30 words, 600 frames)", |b| {
        b.iter(|| {
            let mut pool = filled_pool(30);
            for frame in 0..600 {
                black_box(pool.tick(black_box(frame as f64 / 60.0)));
            }
        })
    });
}

fn bench_keystrokes(c: &mut Criterion) {
    c.bench_function("pool submit_key (30 words)", |b| {
        b.iter(|| {
            let mut pool = filled_pool(30);
            for _ in 0..30 {
                for ch in "surveillance".chars() {
                    black_box(pool.submit_key(black_box(ch)));
                }
            }
        })
    });
}

fn bench_practice(c: &mut Criterion) {
    let text = "Sphinx of black quartz, judge my vow. ".repeat(20);
    let t0 = Instant::now();

    c.bench_function("practice push (760 chars)", |b| {
        b.iter(|| {
            let mut session = PracticeSession::new(&text);
            for ch in text.chars() {
                black_box(session.push(black_box(ch), t0));
            }
        })
    });
}

criterion_group!(benches, bench_tick, bench_keystrokes, bench_practice);
criterion_main!(benches);
