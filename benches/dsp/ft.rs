//! Benchmarks for the Fourier kernels.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use modchain::dsp::fft::{bit_reverse, fft_c_radix2, fft_c_radix2_inplace, fft_r_radix2};
use modchain::dsp::ft::{dft, length_ft};
use num_complex::Complex64;

use crate::BLOCK_SIZES;

fn real_signal(size: usize) -> Vec<f64> {
    (0..size).map(|i| ((i as f64) * 0.37).sin()).collect()
}

fn complex_signal(size: usize) -> Vec<Complex64> {
    (0..size)
        .map(|i| Complex64::new(((i as f64) * 0.37).sin(), ((i as f64) * 0.73).cos()))
        .collect()
}

pub fn bench_ft(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ft");

    for &size in BLOCK_SIZES {
        let signal = real_signal(size);
        let complex = complex_signal(size);
        let bins = length_ft(size);

        // Naive correlation, the O(n^2) reference.
        let mut real = vec![0.0; bins];
        let mut imag = vec![0.0; bins];
        group.bench_with_input(BenchmarkId::new("dft", size), &size, |b, _| {
            b.iter(|| {
                dft(black_box(&signal), &mut real, &mut imag).unwrap();
            })
        });

        // Recursive out-of-place radix-2.
        let mut spectrum = vec![Complex64::default(); size];
        group.bench_with_input(BenchmarkId::new("fft_c", size), &size, |b, _| {
            b.iter(|| {
                fft_c_radix2(black_box(&complex), &mut spectrum).unwrap();
            })
        });

        // Iterative in-place radix-2 plus the reorder pass.
        group.bench_with_input(BenchmarkId::new("fft_c_inplace", size), &size, |b, _| {
            let mut data = complex.clone();
            b.iter(|| {
                fft_c_radix2_inplace(black_box(&mut data)).unwrap();
                bit_reverse(&mut data).unwrap();
            })
        });

        // Real-input packing variant.
        let mut half_spectrum = vec![Complex64::default(); bins];
        group.bench_with_input(BenchmarkId::new("fft_r", size), &size, |b, _| {
            b.iter(|| {
                fft_r_radix2(black_box(&signal), &mut half_spectrum).unwrap();
            })
        });
    }

    group.finish();
}
