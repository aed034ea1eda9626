use crate::NANOS_PER_SEC;

/*
Chain Timer
===========

Modules that care about time (envelopes, latency bookkeeping) keep a
ChainTimer: a running sample counter plus the sample rate and channel count
needed to interpret it. The clock only advances when the owner says so, which
keeps generated audio deterministic regardless of wall-clock scheduling.

Time is derived on demand:

    frames   = samples / channels
    time_ns  = frames * 1_000_000_000 / rate

The multiplication runs in 128-bit integers, so there is no truncated
nanoseconds-per-frame factor and no accumulated drift: sample 44_100 at
44.1 kHz is exactly one second no matter how the counter got there.
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTimer {
    sample: u64,
    rate: u32,
    channels: u32,
}

impl ChainTimer {
    pub fn new(rate: u32) -> Self {
        Self {
            sample: 0,
            rate,
            channels: 1,
        }
    }

    pub fn with_channels(rate: u32, channels: u32) -> Self {
        Self {
            sample: 0,
            rate,
            channels: channels.max(1),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.rate
    }

    pub fn set_sample_rate(&mut self, rate: u32) {
        self.rate = rate;
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn set_channels(&mut self, channels: u32) {
        self.channels = channels.max(1);
    }

    /// Samples counted so far (across all channels).
    pub fn sample(&self) -> u64 {
        self.sample
    }

    /// Frames counted so far.
    pub fn frame(&self) -> u64 {
        self.sample / self.channels as u64
    }

    /// Advance the clock by one sample.
    pub fn tick(&mut self) {
        self.sample += 1;
    }

    /// Advance the clock by `n` samples.
    pub fn advance(&mut self, n: u64) {
        self.sample += n;
    }

    /// Jump the clock to an absolute sample position.
    pub fn set_sample(&mut self, sample: u64) {
        self.sample = sample;
    }

    pub fn reset(&mut self) {
        self.sample = 0;
    }

    /// Elapsed time in nanoseconds at the current sample position.
    pub fn time_ns(&self) -> i64 {
        let frames = (self.sample / self.channels as u64) as i128;
        (frames * NANOS_PER_SEC as i128 / self.rate as i128) as i64
    }

    /// Number of frames from the current position until `stop_ns`.
    ///
    /// Rounds up, so the returned count lands the clock on the first frame
    /// whose time is at or after `stop_ns`. Returns 0 when the stop time has
    /// already passed.
    pub fn frames_until(&self, stop_ns: i64) -> u64 {
        if stop_ns <= 0 {
            return 0;
        }

        let nanos = NANOS_PER_SEC as i128;
        let stop_frame = (stop_ns as i128 * self.rate as i128 + nanos - 1) / nanos;
        (stop_frame as u64).saturating_sub(self.frame())
    }
}

impl Default for ChainTimer {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE)
    }
}
