//! Naive discrete Fourier transforms.
//!
//! These kernels are the O(n squared) textbook correlation forms. They are
//! slow, work on any input length, and are trivially auditable, which makes
//! them the reference the radix-2 kernels are checked against.

use std::f64::consts::TAU;

use crate::buffer::SampleBuffer;
use crate::error::DspError;

/*
A real signal of N samples transforms into N/2 + 1 frequency bins, each a
real (cosine) and imaginary (sine) amplitude. The forward direction
correlates the signal against each basis pair; the inverse sums every bin's
scaled basis back into the time domain. Bin amplitudes are normalised by
N/2, except the first and last real bins which carry half weight because
they have no mirrored counterpart.
*/

/// Number of frequency bins produced by a real transform of `size` samples.
pub fn length_ft(size: usize) -> usize {
    size / 2 + 1
}

/// Number of time-domain samples reconstructed from `size` frequency bins.
pub fn length_ift(size: usize) -> usize {
    (size - 1) * 2
}

fn cos_basis(phase: usize, total: usize, freq: usize) -> f64 {
    (TAU * freq as f64 * phase as f64 / total as f64).cos()
}

fn sin_basis(phase: usize, total: usize, freq: usize) -> f64 {
    (TAU * freq as f64 * phase as f64 / total as f64).sin()
}

/// Forward DFT of a real signal into half-spectrum real/imaginary parts.
///
/// `real` and `imag` must each hold `length_ft(input.len())` bins; they are
/// overwritten.
pub fn dft(input: &[f64], real: &mut [f64], imag: &mut [f64]) -> Result<(), DspError> {
    if input.is_empty() {
        return Err(DspError::Empty);
    }
    if real.len() != imag.len() {
        return Err(DspError::PartMismatch(real.len(), imag.len()));
    }
    let bins = length_ft(input.len());
    if real.len() != bins {
        return Err(DspError::BadOutputLength {
            need: bins,
            got: real.len(),
        });
    }

    let size = input.len();
    for k in 0..bins {
        let mut re = 0.0;
        let mut im = 0.0;
        for (i, &val) in input.iter().enumerate() {
            re += val * cos_basis(i, size, k);
            im -= val * sin_basis(i, size, k);
        }
        real[k] = re;
        imag[k] = im;
    }
    Ok(())
}

/// Inverse DFT of half-spectrum real/imaginary parts back into a signal.
///
/// `output` must hold `length_ift(real.len())` samples; it is overwritten.
pub fn inv_dft(real: &[f64], imag: &[f64], output: &mut [f64]) -> Result<(), DspError> {
    if real.is_empty() {
        return Err(DspError::Empty);
    }
    if real.len() != imag.len() {
        return Err(DspError::PartMismatch(real.len(), imag.len()));
    }
    let size = length_ift(real.len());
    if output.len() != size {
        return Err(DspError::BadOutputLength {
            need: size,
            got: output.len(),
        });
    }

    let bins = real.len();
    let div = size as f64 / 2.0;
    output.fill(0.0);

    for k in 0..bins {
        // The DC and Nyquist bins have no mirror, so they carry half weight.
        let edge = if k == 0 || k == bins - 1 { 0.5 } else { 1.0 };
        let real_part = real[k] * edge / div;
        let imag_part = imag[k] / -div;

        for (i, out) in output.iter_mut().enumerate() {
            *out += real_part * cos_basis(i, size, k) + imag_part * sin_basis(i, size, k);
        }
    }
    Ok(())
}

/// Forward DFT of a single-channel buffer into a two-channel buffer,
/// real bins in channel 0 and imaginary bins in channel 1.
pub fn dft_buffer(input: &SampleBuffer) -> Result<SampleBuffer, DspError> {
    if input.channels() != 1 {
        return Err(DspError::BadChannelCount {
            need: 1,
            got: input.channels(),
        });
    }

    let mut out = SampleBuffer::silence(length_ft(input.frames()), 2);
    let (real, imag) = {
        let frames = out.frames();
        let mut parts = (vec![0.0; frames], vec![0.0; frames]);
        dft(input.channel(0), &mut parts.0, &mut parts.1)?;
        parts
    };
    out.channel_mut(0).copy_from_slice(&real);
    out.channel_mut(1).copy_from_slice(&imag);
    Ok(out)
}

/// Inverse DFT of a two-channel spectrum buffer back into one channel.
pub fn inv_dft_buffer(spectrum: &SampleBuffer) -> Result<SampleBuffer, DspError> {
    if spectrum.channels() != 2 {
        return Err(DspError::BadChannelCount {
            need: 2,
            got: spectrum.channels(),
        });
    }

    let mut out = SampleBuffer::silence(length_ift(spectrum.frames()), 1);
    inv_dft(spectrum.channel(0), spectrum.channel(1), out.channel_mut(0))?;
    Ok(out)
}
