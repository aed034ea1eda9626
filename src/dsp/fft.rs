//! Radix-2 fast Fourier transforms.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::dsp::ft::length_ft;
use crate::error::DspError;

/*
Two kernel families live here.

The out-of-place kernels are recursive decimation-in-time: split the input
into even and odd strides, transform each half into the two halves of the
output slice, then combine with twiddle factors. Input and output are both
in natural order.

The in-place kernels are iterative decimation-in-frequency: butterflies run
on progressively smaller blocks directly inside the caller's slice, with no
scratch allocation. The price is that the result comes out in bit-reversed
order; callers that need natural order run bit_reverse() afterwards. The
permuted form is still usable for order-insensitive spectral work such as
pointwise products or scaling, but the in-place inverse expects its input in
natural order, so the permutation cannot be skipped between a forward pass
and the matching inverse.

Inverse transforms use the conjugate twiddles and scale by 1/N, so
forward-then-inverse reproduces the input. All lengths must be powers of
two.
*/

fn ensure_power_of_two(size: usize) -> Result<(), DspError> {
    if size == 0 || !size.is_power_of_two() {
        return Err(DspError::NotPowerOfTwo(size));
    }
    Ok(())
}

fn ensure_lengths(input: usize, output: usize) -> Result<(), DspError> {
    ensure_power_of_two(input)?;
    if input != output {
        return Err(DspError::BadOutputLength {
            need: input,
            got: output,
        });
    }
    Ok(())
}

/// Recursive decimation-in-time butterfly.
///
/// Reads every `stride`-th element of `input` and writes the transform of
/// that subsequence into `output`. `sign` is -1 for forward, +1 for inverse.
fn fft_recursive(input: &[Complex64], stride: usize, output: &mut [Complex64], sign: f64) {
    let size = output.len();
    if size == 1 {
        output[0] = input[0];
        return;
    }

    let half = size / 2;
    let (evens, odds) = output.split_at_mut(half);
    fft_recursive(input, stride * 2, evens, sign);
    fft_recursive(&input[stride..], stride * 2, odds, sign);

    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, sign * TAU * k as f64 / size as f64);
        let odd = twiddle * odds[k];
        let even = evens[k];
        evens[k] = even + odd;
        odds[k] = even - odd;
    }
}

/// Forward complex FFT, out of place, natural order in and out.
pub fn fft_c_radix2(input: &[Complex64], output: &mut [Complex64]) -> Result<(), DspError> {
    ensure_lengths(input.len(), output.len())?;
    fft_recursive(input, 1, output, -1.0);
    Ok(())
}

/// Inverse complex FFT, out of place, natural order in and out.
pub fn ifft_c_radix2(input: &[Complex64], output: &mut [Complex64]) -> Result<(), DspError> {
    ensure_lengths(input.len(), output.len())?;
    fft_recursive(input, 1, output, 1.0);

    let scale = 1.0 / input.len() as f64;
    for bin in output.iter_mut() {
        *bin *= scale;
    }
    Ok(())
}

/// Iterative decimation-in-frequency butterfly, in place.
fn fft_dif(data: &mut [Complex64], sign: f64) {
    let size = data.len();
    let mut block = size;
    while block > 1 {
        let half = block / 2;
        for start in (0..size).step_by(block) {
            for k in 0..half {
                let a = data[start + k];
                let b = data[start + k + half];
                data[start + k] = a + b;
                let twiddle = Complex64::from_polar(1.0, sign * TAU * k as f64 / block as f64);
                data[start + k + half] = (a - b) * twiddle;
            }
        }
        block = half;
    }
}

/// Forward complex FFT, in place. The result is in bit-reversed order.
pub fn fft_c_radix2_inplace(data: &mut [Complex64]) -> Result<(), DspError> {
    ensure_power_of_two(data.len())?;
    fft_dif(data, -1.0);
    Ok(())
}

/// Inverse complex FFT, in place. The result is in bit-reversed order.
pub fn ifft_c_radix2_inplace(data: &mut [Complex64]) -> Result<(), DspError> {
    ensure_power_of_two(data.len())?;
    fft_dif(data, 1.0);

    let scale = 1.0 / data.len() as f64;
    for bin in data.iter_mut() {
        *bin *= scale;
    }
    Ok(())
}

/// Permute a bit-reversed slice into natural order (or back; the permutation
/// is its own inverse).
pub fn bit_reverse(data: &mut [Complex64]) -> Result<(), DspError> {
    ensure_power_of_two(data.len())?;

    let bits = data.len().trailing_zeros();
    for i in 0..data.len() {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if j > i {
            data.swap(i, j);
        }
    }
    Ok(())
}

/// Forward FFT of a real signal into its `length_ft(n)` half-spectrum.
///
/// Packs sample pairs into n/2 complex bins, transforms once at half size,
/// and untangles the two interleaved spectra via conjugate symmetry.
pub fn fft_r_radix2(input: &[f64], output: &mut [Complex64]) -> Result<(), DspError> {
    ensure_power_of_two(input.len())?;
    let bins = length_ft(input.len());
    if output.len() != bins {
        return Err(DspError::BadOutputLength {
            need: bins,
            got: output.len(),
        });
    }

    // A single sample is its own one-bin spectrum; the pair packing below
    // needs at least two samples.
    if input.len() == 1 {
        output[0] = Complex64::new(input[0], 0.0);
        return Ok(());
    }

    let half = input.len() / 2;
    let packed: Vec<Complex64> = (0..half)
        .map(|k| Complex64::new(input[2 * k], input[2 * k + 1]))
        .collect();
    let mut transformed = vec![Complex64::default(); half];
    fft_c_radix2(&packed, &mut transformed)?;

    let size = input.len();
    for (k, out) in output.iter_mut().enumerate() {
        let a = transformed[k % half];
        let b = transformed[(half - k) % half].conj();
        let even = (a + b) * 0.5;
        let odd = (a - b) * Complex64::new(0.0, -0.5);
        *out = even + Complex64::from_polar(1.0, -TAU * k as f64 / size as f64) * odd;
    }
    Ok(())
}
