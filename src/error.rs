//! Error types for modchain.

use thiserror::Error;

/// Errors raised while driving a module chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain has no modules")]
    EmptyChain,
    #[error("module produced no buffer")]
    MissingBuffer,
    #[error(
        "buffer mismatch: expected {expected_frames} frames x {expected_channels} channels, \
         got {frames} frames x {channels} channels"
    )]
    BufferMismatch {
        expected_frames: usize,
        expected_channels: usize,
        frames: usize,
        channels: usize,
    },
    #[error("channel data lengths differ")]
    RaggedChannels,
    #[error("interleaved data length {len} is not a multiple of {channels} channels")]
    BadInterleave { len: usize, channels: usize },
}

/// Errors raised by the transform kernels when preconditions fail.
///
/// The kernels themselves are pure and failure-free; everything here is a
/// boundary check.
#[derive(Debug, Error)]
pub enum DspError {
    #[error("length {0} is not a power of two")]
    NotPowerOfTwo(usize),
    #[error("input length {0} must be even")]
    OddLength(usize),
    #[error("real/imaginary part lengths differ: {0} vs {1}")]
    PartMismatch(usize, usize),
    #[error("output length {got} does not match required length {need}")]
    BadOutputLength { need: usize, got: usize },
    #[error("input is empty")]
    Empty,
    #[error("buffer must have {need} channels, got {got}")]
    BadChannelCount { need: usize, got: usize },
}

/// Errors raised while decoding a WAV stream.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing RIFF magic, not a RIFF container")]
    BadRiff,
    #[error("missing WAVE magic, not a wave file")]
    BadWave,
    #[error("required chunk {0:?} not found")]
    MissingChunk(&'static str),
    #[error("unsupported format code {0}, only uncompressed PCM is supported")]
    UnsupportedFormat(u16),
    #[error("unsupported bit depth {0}")]
    UnsupportedBits(u16),
    #[error("reader was not started")]
    NotStarted,
}
