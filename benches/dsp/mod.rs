//! Benchmarks for kernels and chain plumbing.

mod chain;
mod envelope;
mod ft;
mod oscillator;

pub use chain::bench_chain;
pub use envelope::bench_envelope;
pub use ft::bench_ft;
pub use oscillator::bench_oscillator;
