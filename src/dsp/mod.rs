//! Pure signal math: transform kernels and envelope segment evaluation.
//! Nothing in this tree touches modules, chains, or I/O.

pub mod fft; // radix-2 Fourier kernels
pub mod ft; // naive reference transforms
pub mod segment; // envelope value functions
