//! WAV (RIFF/WAVE) decoding.

use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::error::WavError;
use crate::io::stream::InputStream;

/*
A WAV file is a RIFF container: a 12-byte header ("RIFF", container size,
"WAVE") followed by chunks, each an ASCII id plus a little-endian byte
count. The "fmt " chunk describes the encoding; "data" carries the PCM
samples, interleaved frame by frame. Any other chunk id is metadata and is
skipped, though its payload still has to be consumed because the stream
only moves forward. Chunk payloads are word-aligned, so an odd-sized chunk
is followed by one pad byte.

Everything malformed is an error: wrong magic, a missing required chunk, a
compressed format code, a bit depth we cannot convert, or a stream ending
mid-chunk. Only uncompressed integer PCM at 8 or 16 bits is supported.
*/

const PCM_FORMAT: u16 = 1;

/// Chunk payloads are pulled in steps of this size, so a corrupt size field
/// cannot demand a multi-gigabyte allocation before the read fails.
const READ_STEP: usize = 64 * 1024;

/// Decoded contents of a "fmt " chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// Pull-based WAV decoder over any input stream.
pub struct WavReader<S: InputStream> {
    stream: S,
    format: Option<WavFormat>,
}

impl<S: InputStream> WavReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            format: None,
        }
    }

    /// Format of the stream, available after `start`.
    pub fn format(&self) -> Option<&WavFormat> {
        self.format.as_ref()
    }

    /// Open the stream and decode the RIFF header and "fmt " chunk.
    pub fn start(&mut self) -> Result<(), WavError> {
        self.stream.start()?;

        let mut header = [0u8; 12];
        self.stream.read_exact_bytes(&mut header)?;
        if &header[0..4] != b"RIFF" {
            return Err(WavError::BadRiff);
        }
        if &header[8..12] != b"WAVE" {
            return Err(WavError::BadWave);
        }

        let body = self.seek_chunk(b"fmt ")?;
        if body.len() < 16 {
            return Err(WavError::MissingChunk("fmt "));
        }

        let format = WavFormat {
            format: u16::from_le_bytes([body[0], body[1]]),
            channels: u16::from_le_bytes([body[2], body[3]]),
            sample_rate: u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
            byte_rate: u32::from_le_bytes([body[8], body[9], body[10], body[11]]),
            block_align: u16::from_le_bytes([body[12], body[13]]),
            bits_per_sample: u16::from_le_bytes([body[14], body[15]]),
        };

        if format.format != PCM_FORMAT {
            return Err(WavError::UnsupportedFormat(format.format));
        }
        if format.bits_per_sample != 8 && format.bits_per_sample != 16 {
            return Err(WavError::UnsupportedBits(format.bits_per_sample));
        }

        debug!(
            channels = format.channels,
            sample_rate = format.sample_rate,
            bits = format.bits_per_sample,
            "decoded wave format"
        );
        self.format = Some(format);
        Ok(())
    }

    /// Decode the "data" chunk into an interleaved sample buffer.
    pub fn read_all(&mut self) -> Result<SampleBuffer, WavError> {
        let format = self.format.ok_or(WavError::NotStarted)?;
        let body = self.seek_chunk(b"data")?;

        let channels = format.channels.max(1) as usize;
        let mut samples: Vec<f64> = match format.bits_per_sample {
            8 => body.iter().map(|&b| (b as f64 - 128.0) / 128.0).collect(),
            16 => body
                .chunks_exact(2)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f64 / 32_768.0)
                .collect(),
            bits => return Err(WavError::UnsupportedBits(bits)),
        };
        // A trailing partial frame carries no usable audio.
        samples.truncate(samples.len() - samples.len() % channels);

        // Length is a channel multiple after the truncation above.
        Ok(SampleBuffer::from_interleaved(&samples, channels)
            .unwrap_or_else(|_| SampleBuffer::silence(0, channels)))
    }

    pub fn stop(&mut self) -> Result<(), WavError> {
        self.stream.stop()?;
        Ok(())
    }

    /// Advance to the chunk named `id`, consuming the payload of every
    /// chunk before it, and return that chunk's payload.
    fn seek_chunk(&mut self, id: &'static [u8; 4]) -> Result<Vec<u8>, WavError> {
        loop {
            let mut header = [0u8; 8];
            match self.stream.read_exact_bytes(&mut header) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                    // Ran off the end of the container without finding it.
                    return Err(WavError::MissingChunk(chunk_name(id)));
                }
                Err(err) => return Err(err.into()),
            }

            let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
            // Chunks are word-aligned; odd sizes are followed by a pad byte.
            let padded = size + size % 2;

            // Grow the body only as bytes actually arrive; the declared
            // size is untrusted input.
            let mut body = Vec::new();
            let mut remaining = padded;
            while remaining > 0 {
                let take = remaining.min(READ_STEP);
                let start = body.len();
                body.resize(start + take, 0);
                self.stream.read_exact_bytes(&mut body[start..])?;
                remaining -= take;
            }

            if &header[0..4] == id {
                body.truncate(size);
                return Ok(body);
            }
            debug!(
                chunk = %String::from_utf8_lossy(&header[0..4]),
                size, "skipping chunk"
            );
        }
    }
}

fn chunk_name(id: &'static [u8; 4]) -> &'static str {
    match id {
        b"fmt " => "fmt ",
        b"data" => "data",
        _ => "chunk",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::stream::MemoryStream;

    fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        if body.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn fmt_chunk(format: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * bits / 8;
        let byte_rate = rate * block_align as u32;
        let mut body = Vec::new();
        body.extend_from_slice(&format.to_le_bytes());
        body.extend_from_slice(&channels.to_le_bytes());
        body.extend_from_slice(&rate.to_le_bytes());
        body.extend_from_slice(&byte_rate.to_le_bytes());
        body.extend_from_slice(&block_align.to_le_bytes());
        body.extend_from_slice(&bits.to_le_bytes());
        chunk(b"fmt ", &body)
    }

    fn wave_file(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(4 + body.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&body);
        out
    }

    fn reader(bytes: Vec<u8>) -> WavReader<MemoryStream> {
        WavReader::new(MemoryStream::new(bytes))
    }

    #[test]
    fn decodes_16_bit_stereo() {
        let pcm: Vec<u8> = [16_384i16, -16_384, 32_767, -32_768]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let file = wave_file(&[fmt_chunk(1, 2, 44_100, 16), chunk(b"data", &pcm)]);

        let mut reader = reader(file);
        reader.start().unwrap();

        let format = reader.format().unwrap();
        assert_eq!(format.channels, 2);
        assert_eq!(format.sample_rate, 44_100);

        let buff = reader.read_all().unwrap();
        assert_eq!(buff.frames(), 2);
        assert_eq!(buff.channel(0), &[0.5, 32_767.0 / 32_768.0]);
        assert_eq!(buff.channel(1), &[-0.5, -1.0]);
    }

    #[test]
    fn decodes_8_bit_mono() {
        let file = wave_file(&[
            fmt_chunk(1, 1, 8_000, 8),
            chunk(b"data", &[128, 255, 0, 192]),
        ]);

        let mut reader = reader(file);
        reader.start().unwrap();
        let buff = reader.read_all().unwrap();

        assert_eq!(buff.channels(), 1);
        assert_eq!(buff.channel(0)[0], 0.0);
        assert_eq!(buff.channel(0)[2], -1.0);
        assert_eq!(buff.channel(0)[3], 0.5);
    }

    #[test]
    fn skips_unknown_chunks() {
        // LIST metadata before fmt and an odd-sized chunk before data.
        let file = wave_file(&[
            chunk(b"LIST", b"some metadata"),
            fmt_chunk(1, 1, 44_100, 16),
            chunk(b"junk", &[1, 2, 3]),
            chunk(b"data", &1000i16.to_le_bytes()),
        ]);

        let mut reader = reader(file);
        reader.start().unwrap();
        let buff = reader.read_all().unwrap();
        assert_eq!(buff.frames(), 1);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut riff = reader(b"JUNK....WAVE".to_vec());
        assert!(matches!(riff.start(), Err(WavError::BadRiff)));

        let mut wave = reader(b"RIFF\x04\x00\x00\x00AIFF".to_vec());
        assert!(matches!(wave.start(), Err(WavError::BadWave)));
    }

    #[test]
    fn rejects_compressed_formats() {
        let file = wave_file(&[fmt_chunk(3, 1, 44_100, 16)]);
        let mut reader = reader(file);
        assert!(matches!(reader.start(), Err(WavError::UnsupportedFormat(3))));
    }

    #[test]
    fn rejects_unsupported_bit_depths() {
        let file = wave_file(&[fmt_chunk(1, 1, 44_100, 24)]);
        let mut reader = reader(file);
        assert!(matches!(reader.start(), Err(WavError::UnsupportedBits(24))));
    }

    #[test]
    fn missing_data_chunk_is_an_error() {
        let file = wave_file(&[fmt_chunk(1, 1, 44_100, 16)]);
        let mut reader = reader(file);
        reader.start().unwrap();
        assert!(matches!(reader.read_all(), Err(WavError::MissingChunk("data"))));
    }

    #[test]
    fn oversized_chunk_declaration_is_an_io_error() {
        // A corrupt header declaring a gigabyte-scale payload over a few
        // actual bytes must fail at the stream, not on allocation.
        let mut bogus = Vec::new();
        bogus.extend_from_slice(b"data");
        bogus.extend_from_slice(&0x4000_0000u32.to_le_bytes());
        bogus.extend_from_slice(&[0u8; 16]);

        let file = wave_file(&[fmt_chunk(1, 1, 44_100, 16), bogus]);
        let mut reader = reader(file);
        reader.start().unwrap();
        assert!(matches!(reader.read_all(), Err(WavError::Io(_))));
    }

    #[test]
    fn truncated_chunk_is_an_error() {
        let mut file = wave_file(&[fmt_chunk(1, 1, 44_100, 16), chunk(b"data", &[0u8; 64])]);
        file.truncate(file.len() - 32);

        let mut reader = reader(file);
        reader.start().unwrap();
        assert!(matches!(reader.read_all(), Err(WavError::Io(_))));
    }

    #[test]
    fn read_before_start_is_an_error() {
        let mut reader = reader(Vec::new());
        assert!(matches!(reader.read_all(), Err(WavError::NotStarted)));
    }
}
