//! Benchmarks for the voice bank's block render.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::{
    dsp::{AutomationEvent, Waveform},
    engine::{EngineClock, EngineCommand, VoiceBank, VoiceId},
};

use crate::BLOCK_SIZES;

/// A bank with `voices` sustained notes that never stop.
fn sustained_bank(voices: u64) -> VoiceBank {
    let mut bank = VoiceBank::new(EngineClock::new(48_000.0));
    for id in 0..voices {
        let voice = VoiceId(id);
        bank.apply(EngineCommand::Create {
            voice,
            frequency: 261.63 * (1.0 + id as f32 / 12.0),
            waveform: Waveform::ALL[id as usize % Waveform::ALL.len()],
        });
        bank.apply(EngineCommand::Schedule {
            voice,
            event: AutomationEvent::set(0.0, 0.0),
        });
        bank.apply(EngineCommand::Schedule {
            voice,
            event: AutomationEvent::linear(0.05, 1.0),
        });
        bank.apply(EngineCommand::Schedule {
            voice,
            event: AutomationEvent::exponential(0.15, 0.7),
        });
        bank.apply(EngineCommand::Start { voice, at: 0.0 });
    }
    bank
}

pub fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/bank");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voices in [1u64, 4, 24] {
            let mut bank = sustained_bank(voices);
            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        bank.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Silent bank - the idle cost of the callback
        let mut bank = VoiceBank::new(EngineClock::new(48_000.0));
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                bank.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
