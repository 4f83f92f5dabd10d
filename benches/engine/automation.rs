//! Benchmarks for gain timeline evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::dsp::{AutomationEvent, AutomationParam, ScheduledEnvelope};

use crate::BLOCK_SIZES;

/// A full note: attack, decay, release.
fn note_timeline() -> AutomationParam {
    let mut gain = AutomationParam::new(1.0);
    gain.schedule(AutomationEvent::set(0.0, 0.0));
    gain.schedule(AutomationEvent::linear(0.05, 1.0));
    gain.schedule(AutomationEvent::exponential(0.15, 0.7));
    gain.schedule(AutomationEvent::set(0.5, 0.7));
    gain.schedule(AutomationEvent::exponential(0.7, 0.001));
    gain
}

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/automation");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let gain = note_timeline();

        // Linear attack segment
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = gain.value_at(black_box(0.01 + i as f64 / sample_rate));
                }
            })
        });

        // Exponential decay segment - powf per sample
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = gain.value_at(black_box(0.1 + i as f64 / sample_rate));
                }
            })
        });

        // Past the last event - constant hold
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = gain.value_at(black_box(1.0 + i as f64 / sample_rate));
                }
            })
        });
    }

    // Scheduling cost when a key is released over a busy timeline
    group.bench_function("release_reschedule", |b| {
        b.iter(|| {
            let mut gain = note_timeline();
            let now = black_box(0.3);
            let held = gain.value_at(now);
            gain.cancel_scheduled(now);
            gain.schedule(AutomationEvent::set(now, held));
            gain.schedule(AutomationEvent::exponential(now + 0.2, 0.001));
            black_box(gain.value_at(now + 0.1))
        })
    });

    group.finish();
}
