//! Benchmarks for the tick loop and the diff flush.
//!
//! The tick loop is the per-frame hot path; the flush bounds how much
//! terminal output each frame costs.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use tankgrid::config::Config;
use tankgrid::game::{Game, Tick};

fn running_game(seed: u64) -> Game {
    let mut game = Game::seeded(Config::default(), seed).unwrap_or_else(|e| panic!("level setup failed: {e}"));
    let _ = game.update(Some('c'));
    game
}

fn bench_ticks(c: &mut Criterion) {
    let game = running_game(42);

    c.bench_function("100_ticks", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| {
                for _ in 0..100 {
                    if let Ok(Tick::Resolved(_)) = game.update(black_box(None)) {
                        break;
                    }
                }
                black_box(game)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_tick_and_flush(c: &mut Criterion) {
    let game = running_game(7);

    c.bench_function("tick_then_flush", |b| {
        b.iter_batched(
            || (game.clone(), Vec::with_capacity(64 * 1024)),
            |(mut game, mut out)| {
                let _ = game.update(black_box(None));
                let written = game.buffer_mut().flush(&mut out);
                black_box((written, out))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_full_repaint(c: &mut Criterion) {
    let game = running_game(3);

    c.bench_function("full_repaint", |b| {
        b.iter_batched(
            || {
                let mut buffer = game.buffer().clone();
                buffer.reset();
                buffer
            },
            |mut buffer| {
                let mut out = Vec::with_capacity(64 * 1024);
                let written = buffer.flush(&mut out);
                black_box((written, out))
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_ticks, bench_tick_and_flush, bench_full_repaint);
criterion_main!(benches);
