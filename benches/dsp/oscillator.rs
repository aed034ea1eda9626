//! Benchmarks for waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modchain::chain::AudioModule;
use modchain::oscillator::Oscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let shapes = [
            ("sine", Oscillator::sine(440.0)),
            ("square", Oscillator::square(440.0)),
            ("saw", Oscillator::saw(440.0)),
            ("triangle", Oscillator::triangle(440.0)),
        ];

        for (name, mut osc) in shapes {
            osc.info_mut().buffer_size = size;
            osc.start().unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.process(black_box(None)).unwrap();
                    osc.get_buffer().unwrap();
                })
            });
        }
    }

    group.finish();
}
