//! Benchmarks for whole-chain buffer pulls.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modchain::chain::meta::Amplify;
use modchain::chain::mix::MixDown;
use modchain::chain::Chain;
use modchain::oscillator::Oscillator;

use crate::BLOCK_SIZES;

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/chain");

    for &size in BLOCK_SIZES {
        // Source plus one transform, the minimal useful chain.
        let mut chain = Chain::new()
            .with(Oscillator::saw(220.0))
            .with(Amplify::new(0.5));
        chain.source_info_mut().unwrap().buffer_size = size;
        chain.start().unwrap();
        group.bench_with_input(BenchmarkId::new("source_amplify", size), &size, |b, _| {
            b.iter(|| {
                chain.process().unwrap();
                black_box(chain.take_output()).unwrap();
            })
        });

        // Eight detuned sources summed through a mixdown.
        let mut mix = MixDown::new();
        for voice in 0..8 {
            mix.attach(Chain::new().with(Oscillator::saw(220.0 + voice as f64)));
        }
        let mut chain = Chain::new().with(mix);
        chain.source_info_mut().unwrap().buffer_size = size;
        chain.start().unwrap();
        group.bench_with_input(BenchmarkId::new("mixdown_8", size), &size, |b, _| {
            b.iter(|| {
                chain.process().unwrap();
                black_box(chain.take_output()).unwrap();
            })
        });
    }

    group.finish();
}
