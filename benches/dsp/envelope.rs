//! Benchmarks for segment evaluation and sequencing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modchain::chain::AudioModule;
use modchain::dsp::segment::Segment;
use modchain::envelope::{ChainEnvelope, Envelope};
use modchain::NANOS_PER_SEC;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // One exponential leg, the most expensive value function.
        let mut env = Envelope::new(Segment::exponential_ramp(
            0,
            60 * NANOS_PER_SEC,
            0.001,
            1.0,
        ));
        env.info_mut().buffer_size = size;
        env.start().unwrap();
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| {
                env.process(black_box(None)).unwrap();
                env.get_buffer().unwrap();
            })
        });

        // A sequence with boundaries to cross.
        let mut seq = ChainEnvelope::new();
        for leg in 0..64 {
            let start = leg * NANOS_PER_SEC / 10;
            seq.add_segment(Segment::linear_ramp(
                start,
                start + NANOS_PER_SEC / 10,
                0.0,
                1.0,
            ));
        }
        seq.info_mut().buffer_size = size;
        seq.start().unwrap();
        group.bench_with_input(BenchmarkId::new("sequence", size), &size, |b, _| {
            b.iter(|| {
                seq.process(black_box(None)).unwrap();
                seq.get_buffer().unwrap();
            })
        });
    }

    group.finish();
}
