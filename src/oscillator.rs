//! Fundamental waveform sources.

use std::f64::consts::TAU;

use crate::buffer::SampleBuffer;
use crate::chain::{AudioModule, ChainError, ModuleCore};

/// Waveform shapes the oscillator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` cycles (one cycle per 1.0).
    ///
    /// All four shapes are closed-form functions of the fractional cycle
    /// position, so there is no per-sample state beyond the phase itself.
    fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase.fract() < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * (phase + 0.5).fract() - 1.0,
            Waveform::Triangle => {
                let cycle = phase.fract();
                if cycle < 0.25 {
                    cycle * 4.0
                } else if cycle > 0.75 {
                    (cycle - 1.0) * 4.0
                } else {
                    (0.5 - cycle) * 4.0
                }
            }
        }
    }
}

/// Source module producing one of the fundamental waveforms.
///
/// A zero frequency means "unset"; the start hook fills it (and the sample
/// rate and velocity) from the propagated chain configuration. Velocity
/// scales the waveform's amplitude. Multi-channel chains get the same
/// waveform duplicated across every channel.
pub struct Oscillator {
    core: ModuleCore,
    waveform: Waveform,
    frequency: f64,
    velocity: f64,
    sample_rate: u32,
    phase: u64, // frames since start
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            core: ModuleCore::new(),
            waveform,
            frequency,
            velocity: 1.0,
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            phase: 0,
        }
    }

    pub fn sine(frequency: f64) -> Self {
        Self::new(Waveform::Sine, frequency)
    }

    pub fn square(frequency: f64) -> Self {
        Self::new(Waveform::Square, frequency)
    }

    pub fn saw(frequency: f64) -> Self {
        Self::new(Waveform::Saw, frequency)
    }

    pub fn triangle(frequency: f64) -> Self {
        Self::new(Waveform::Triangle, frequency)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }
}

impl AudioModule for Oscillator {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn start(&mut self) -> Result<(), ChainError> {
        self.sample_rate = self.core.info.sample_rate;
        self.velocity = self.core.info.velocity;
        if self.frequency == 0.0 {
            self.frequency = self.core.info.frequency;
        }
        self.phase = 0;
        Ok(())
    }

    fn process(&mut self, _input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let mut buff = self.create_buffer();
        let channels = buff.channels();

        for frame in 0..buff.frames() {
            let phase = self.frequency * self.phase as f64 / self.sample_rate as f64;
            let value = self.waveform.sample(phase) * self.velocity;
            for ch in 0..channels {
                buff.set(ch, frame, value);
            }
            self.phase += 1;
        }

        self.set_buffer(buff);
        Ok(())
    }
}

/// Source that emits a fixed value. Useful for testing and as a DC offset.
pub struct ConstantOscillator {
    core: ModuleCore,
    value: f64,
}

impl ConstantOscillator {
    pub fn new(value: f64) -> Self {
        Self {
            core: ModuleCore::new(),
            value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }
}

impl AudioModule for ConstantOscillator {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn process(&mut self, _input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let mut buff = self.create_buffer();
        for sample in buff.iter_sequential_mut() {
            *sample = self.value;
        }
        self.set_buffer(buff);
        Ok(())
    }
}
