pub mod buffer; // Multi-channel sample storage with dual iteration views
pub mod chain; // Module protocol and pull-based chain execution
pub mod dsp;
pub mod envelope; // Time-driven value generators and the segment sequencer
pub mod error;
pub mod io;
pub mod oscillator; // Fundamental waveform producers
pub mod timer; // Sample-count to nanosecond chain clock

/// Default sample rate for freshly constructed modules.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default frames per buffer for freshly constructed modules.
pub const DEFAULT_BUFFER_SIZE: usize = 440;

/// Nanoseconds per second, the unit every chain clock speaks.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Substitute for zero where a value feeds a division or a log.
pub const SMALL: f64 = 1e-6;

/// Sentinel stop time meaning "hold forever".
pub const INFINITE_STOP: i64 = -1;
