//! Bookkeeping and utility modules: counters, latency tracking, stored
//! buffers, and plain amplification.

use std::time::Instant;

use crate::buffer::SampleBuffer;
use crate::chain::{AudioModule, ChainError, ModuleCore};
use crate::timer::ChainTimer;

/// Counts process calls and samples as they pass through.
#[derive(Default)]
pub struct Counter {
    core: ModuleCore,
    processed: u64,
    samples: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of process calls seen.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Total samples seen across all calls.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn reset(&mut self) {
        self.processed = 0;
        self.samples = 0;
    }
}

impl AudioModule for Counter {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn process(&mut self, input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let buff = input.ok_or(ChainError::MissingBuffer)?;
        self.processed += 1;
        self.samples += buff.len() as u64;
        self.set_buffer(buff);
        Ok(())
    }
}

/*
Latency bookkeeping
===================

The latency module compares two clocks. The chain clock is the amount of
audio that has passed through, converted to nanoseconds by a ChainTimer.
The wall clock is real elapsed time since start. A chain keeping up with
real time holds the difference near zero; a chain falling behind shows it
growing. Operation time is the wall-clock gap between successive process
calls, which is how long the backward chain took to fill one buffer.
*/

/// Pass-through module that tracks wall-clock latency against the amount of
/// audio processed.
#[derive(Default)]
pub struct LatencyModule {
    core: ModuleCore,
    timer: ChainTimer,
    started: Option<Instant>,
    last_process: Option<Instant>,
    processed: u64,
    last_operation_ns: i64,
    total_operation_ns: i64,
    last_latency_ns: i64,
    total_latency_ns: i64,
}

impl LatencyModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock time of the most recent process call, in nanoseconds.
    pub fn operation_time(&self) -> i64 {
        self.last_operation_ns
    }

    pub fn total_operation_time(&self) -> i64 {
        self.total_operation_ns
    }

    /// Wall-clock lead or lag against the chain clock at the last call.
    pub fn latency(&self) -> i64 {
        self.last_latency_ns
    }

    pub fn total_latency(&self) -> i64 {
        self.total_latency_ns
    }

    /// Mean operation time, or `None` before the first process call.
    pub fn average_time(&self) -> Option<i64> {
        if self.processed == 0 {
            return None;
        }
        Some(self.total_operation_ns / self.processed as i64)
    }

    /// Mean latency, or `None` before the first process call.
    pub fn average_latency(&self) -> Option<i64> {
        if self.processed == 0 {
            return None;
        }
        Some(self.total_latency_ns / self.processed as i64)
    }

    /// Expected elapsed time according to the chain clock.
    pub fn expected_time(&self) -> i64 {
        self.timer.time_ns()
    }
}

impl AudioModule for LatencyModule {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn start(&mut self) -> Result<(), ChainError> {
        self.timer =
            ChainTimer::with_channels(self.core.info.sample_rate, self.core.info.channels as u32);
        self.started = Some(Instant::now());
        self.last_process = None;
        self.processed = 0;
        self.last_operation_ns = 0;
        self.total_operation_ns = 0;
        self.last_latency_ns = 0;
        self.total_latency_ns = 0;
        Ok(())
    }

    fn process(&mut self, input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let buff = input.ok_or(ChainError::MissingBuffer)?;
        let now = Instant::now();

        let since = self.last_process.or(self.started).unwrap_or(now);
        self.last_operation_ns = now.duration_since(since).as_nanos() as i64;
        self.total_operation_ns += self.last_operation_ns;

        if let Some(started) = self.started {
            let elapsed = now.duration_since(started).as_nanos() as i64;
            self.last_latency_ns = elapsed - self.timer.time_ns();
            self.total_latency_ns += self.last_latency_ns;
        }

        self.timer.advance(buff.len() as u64);
        self.last_process = Some(now);
        self.processed += 1;
        self.set_buffer(buff);
        Ok(())
    }
}

/// Source that replays one stored buffer forever.
///
/// At start the stored buffer's shape becomes the chain's buffer shape, so
/// forward modules see exactly the stored frames on every call.
pub struct BufferModule {
    core: ModuleCore,
    stored: SampleBuffer,
}

impl BufferModule {
    pub fn new(stored: SampleBuffer) -> Self {
        Self {
            core: ModuleCore::new(),
            stored,
        }
    }

    /// Replace the stored buffer.
    pub fn set_stored(&mut self, stored: SampleBuffer) {
        self.stored = stored;
    }

    pub fn stored(&self) -> &SampleBuffer {
        &self.stored
    }
}

impl AudioModule for BufferModule {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn start(&mut self) -> Result<(), ChainError> {
        self.core.info.buffer_size = self.stored.frames();
        self.core.info.channels = self.stored.channels();
        Ok(())
    }

    fn process(&mut self, _input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let buff = self.stored.clone();
        self.set_buffer(buff);
        Ok(())
    }
}

/// Multiplies every sample by a fixed gain.
pub struct Amplify {
    core: ModuleCore,
    gain: f64,
}

impl Amplify {
    pub fn new(gain: f64) -> Self {
        Self {
            core: ModuleCore::new(),
            gain,
        }
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }
}

impl AudioModule for Amplify {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn process(&mut self, input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let mut buff = input.ok_or(ChainError::MissingBuffer)?;
        for sample in buff.iter_sequential_mut() {
            *sample *= self.gain;
        }
        self.set_buffer(buff);
        Ok(())
    }
}
