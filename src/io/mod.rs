//! Byte stream abstractions and WAV decoding.

pub mod stream;
pub mod wav;
