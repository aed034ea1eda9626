use crate::error::ChainError;

/*
Sample Buffers
==============

A SampleBuffer owns a flat block of f64 samples logically arranged as
N channels x M frames. Storage is channel-major ("sequential"): all of
channel 0, then all of channel 1, and so on. Two read orders are exposed:

  sequential    ch0f0, ch0f1, ..., ch0fM, ch1f0, ...   (storage order)
  interleaved   ch0f0, ch1f0, ch0f1, ch1f1, ...        (frame-major)

The channel count is fixed at construction and `len() == channels * frames`
holds for the buffer's whole life. Buffers are plain move-only values:
handing one to another module is a transfer of ownership, so at most one
module ever holds a given buffer.
*/

#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    data: Vec<f64>, // channel-major
    channels: usize,
    frames: usize,
}

impl SampleBuffer {
    /// Create a zero-filled buffer of `frames` frames across `channels` channels.
    pub fn silence(frames: usize, channels: usize) -> Self {
        let channels = channels.max(1);
        Self {
            data: vec![0.0; frames * channels],
            channels,
            frames,
        }
    }

    /// Wrap a single channel of samples.
    pub fn from_channel(data: Vec<f64>) -> Self {
        let frames = data.len();
        Self {
            data,
            channels: 1,
            frames,
        }
    }

    /// Build a buffer from per-channel sample vectors.
    ///
    /// All channels must carry the same number of frames.
    pub fn from_channels(channels: Vec<Vec<f64>>) -> Result<Self, ChainError> {
        let count = channels.len().max(1);
        let frames = channels.first().map(Vec::len).unwrap_or(0);
        if channels.iter().any(|c| c.len() != frames) {
            return Err(ChainError::RaggedChannels);
        }

        let mut data = Vec::with_capacity(count * frames);
        for channel in &channels {
            data.extend_from_slice(channel);
        }
        if channels.is_empty() {
            // No channels supplied: an empty single-channel buffer.
            return Ok(Self::silence(0, 1));
        }

        Ok(Self {
            data,
            channels: count,
            frames,
        })
    }

    /// Build a buffer from frame-major (interleaved) samples.
    pub fn from_interleaved(data: &[f64], channels: usize) -> Result<Self, ChainError> {
        let channels = channels.max(1);
        if data.len() % channels != 0 {
            return Err(ChainError::BadInterleave {
                len: data.len(),
                channels,
            });
        }

        let frames = data.len() / channels;
        let mut buff = Self::silence(frames, channels);
        for frame in 0..frames {
            for ch in 0..channels {
                buff.set(ch, frame, data[frame * channels + ch]);
            }
        }
        Ok(buff)
    }

    /// Total number of samples (`channels * frames`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples of channel `ch`, in frame order.
    pub fn channel(&self, ch: usize) -> &[f64] {
        &self.data[ch * self.frames..(ch + 1) * self.frames]
    }

    pub fn channel_mut(&mut self, ch: usize) -> &mut [f64] {
        &mut self.data[ch * self.frames..(ch + 1) * self.frames]
    }

    pub fn get(&self, ch: usize, frame: usize) -> f64 {
        self.data[ch * self.frames + frame]
    }

    pub fn set(&mut self, ch: usize, frame: usize, value: f64) {
        self.data[ch * self.frames + frame] = value;
    }

    /// Iterate in storage order: every frame of channel 0, then channel 1, ...
    pub fn iter_sequential(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    pub fn iter_sequential_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.data.iter_mut()
    }

    /// Iterate frame-major: ch0f0, ch1f0, ch0f1, ch1f1, ...
    pub fn iter_interleaved(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.frames)
            .flat_map(move |frame| (0..self.channels).map(move |ch| self.get(ch, frame)))
    }

    /// Copy all samples out in frame-major order.
    pub fn to_interleaved(&self) -> Vec<f64> {
        self.iter_interleaved().collect()
    }

    /// Zero every sample in place.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_invariant_holds() {
        let buff = SampleBuffer::silence(100, 3);
        assert_eq!(buff.len(), 300);
        assert_eq!(buff.frames(), 100);
        assert_eq!(buff.channels(), 3);
        assert!(buff.iter_sequential().all(|s| s == 0.0));
    }

    #[test]
    fn sequential_is_channel_major() {
        let buff =
            SampleBuffer::from_channels(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

        let seq: Vec<f64> = buff.iter_sequential().collect();
        assert_eq!(seq, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn interleaved_is_frame_major() {
        let buff =
            SampleBuffer::from_channels(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

        let inter: Vec<f64> = buff.iter_interleaved().collect();
        assert_eq!(inter, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn interleaved_round_trip() {
        let data = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buff = SampleBuffer::from_interleaved(&data, 2).unwrap();

        assert_eq!(buff.frames(), 3);
        assert_eq!(buff.channel(0), &[0.1, 0.2, 0.3]);
        assert_eq!(buff.channel(1), &[-0.1, -0.2, -0.3]);
        assert_eq!(buff.to_interleaved(), data.to_vec());
    }

    #[test]
    fn ragged_channels_rejected() {
        let result = SampleBuffer::from_channels(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(ChainError::RaggedChannels)));
    }

    #[test]
    fn bad_interleave_rejected() {
        let result = SampleBuffer::from_interleaved(&[1.0, 2.0, 3.0], 2);
        assert!(matches!(result, Err(ChainError::BadInterleave { .. })));
    }
}
