//! Benchmarks for keyboard sessions rendered offline.
//!
//! These include the control side (routing, envelope scheduling) and the
//! engine render, as a real session would run them.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::{
    engine::OfflineBackend, input::InputEvent, keys::KEYS, Keyboard, KeyboardConfig,
};

use crate::BLOCK_SIZES;

pub fn bench_chords(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chords");

    for &size in BLOCK_SIZES {
        // C major triad held at sustain
        let mut triad = Keyboard::new(OfflineBackend::new(48_000.0), &KeyboardConfig::default());
        for code in ["90", "67", "66"] {
            triad.handle(InputEvent::KeyDown(code.into()));
        }
        triad.backend_mut().render_seconds(0.2);

        group.bench_with_input(BenchmarkId::new("triad", size), &size, |b, &size| {
            b.iter(|| black_box(triad.backend_mut().render(size)))
        });

        // Every key down at once
        let mut all = Keyboard::new(OfflineBackend::new(48_000.0), &KeyboardConfig::default());
        for key in KEYS.iter() {
            all.handle(InputEvent::KeyDown(key.input_code.into()));
        }
        all.backend_mut().render_seconds(0.2);

        group.bench_with_input(BenchmarkId::new("all_keys", size), &size, |b, &size| {
            b.iter(|| black_box(all.backend_mut().render(size)))
        });
    }

    group.finish();
}

/// Press and release a key per block, as fast trills do.
pub fn bench_key_mashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/key_mashing");

    for &size in BLOCK_SIZES {
        let mut keyboard =
            Keyboard::new(OfflineBackend::new(48_000.0), &KeyboardConfig::default());
        let mut next = 0usize;

        group.bench_with_input(BenchmarkId::new("trill", size), &size, |b, &size| {
            b.iter(|| {
                let code = KEYS[next % KEYS.len()].input_code;
                next += 1;
                keyboard.handle(InputEvent::KeyDown(code.into()));
                black_box(keyboard.backend_mut().render(size));
                keyboard.handle(InputEvent::KeyUp(code.into()));
                keyboard.backend_mut().clear_commands();
            })
        });
    }

    group.finish();
}
