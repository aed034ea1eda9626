//! Envelope modules: single-segment generators and the segment sequencer.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::trace;

use crate::buffer::SampleBuffer;
use crate::chain::{AudioModule, ChainError, ModuleCore};
use crate::dsp::segment::Segment;
use crate::timer::ChainTimer;

/*
Envelopes
=========

An envelope is a source module whose samples come from a value function of
time rather than a waveform. The Envelope module wraps one Segment; the
ChainEnvelope sequencer walks an ordered list of segments and splices their
values into a single continuous stream.

The sequencer's rules, sample by sample:

  - the current segment supplies values while the clock is before its stop
    time (a segment whose stop has been reached is finished, even exactly
    at the boundary);
  - when a segment finishes before the next one starts, the gap holds the
    finished segment's stop value;
  - when the list runs out, the last stop value holds forever.

One process call may cross several of these boundaries; the fill loop cuts
the output buffer at each one, so a buffer can contain the tail of one
segment, a hold, and the head of the next.

Envelopes are single-channel by construction. Their start hook forces the
channel count to one, and everything forward of them in the chain sees that
through normal info propagation.
*/

/// Source module that renders one segment against a chain clock.
pub struct Envelope {
    core: ModuleCore,
    segment: Segment,
    timer: ChainTimer,
}

impl Envelope {
    pub fn new(segment: Segment) -> Self {
        Self {
            core: ModuleCore::new(),
            segment,
            timer: ChainTimer::default(),
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn set_segment(&mut self, segment: Segment) {
        self.segment = segment;
    }

    /// Current clock position in nanoseconds.
    pub fn time_ns(&self) -> i64 {
        self.timer.time_ns()
    }
}

impl AudioModule for Envelope {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn start(&mut self) -> Result<(), ChainError> {
        self.core.info.channels = 1;
        self.timer = ChainTimer::new(self.core.info.sample_rate);
        Ok(())
    }

    fn process(&mut self, _input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let mut buff = self.create_buffer();
        for sample in buff.channel_mut(0) {
            *sample = self.segment.value_at(self.timer.time_ns());
            self.timer.tick();
        }
        self.set_buffer(buff);
        Ok(())
    }
}

/// Commands a driving thread can send to a running sequencer.
#[cfg(feature = "rtrb")]
pub enum EnvelopeCommand {
    /// Force-advance past the current segment or hold.
    Advance,
    /// Rewind the clock and cursor to the beginning.
    Reset,
}

/// Lock-free control handle for a `ChainEnvelope` owned by another thread.
#[cfg(feature = "rtrb")]
pub struct ChainEnvelopeHandle {
    tx: Producer<EnvelopeCommand>,
}

#[cfg(feature = "rtrb")]
impl ChainEnvelopeHandle {
    pub fn advance(&mut self) {
        let _ = self.tx.push(EnvelopeCommand::Advance);
    }

    pub fn reset(&mut self) {
        let _ = self.tx.push(EnvelopeCommand::Reset);
    }
}

#[cfg(feature = "rtrb")]
const COMMAND_QUEUE_SIZE: usize = 64;

/// Sequencer that splices an ordered list of segments into one stream.
#[derive(Default)]
pub struct ChainEnvelope {
    core: ModuleCore,
    segments: Vec<Segment>,
    cursor: usize,
    hold: Option<Segment>,
    timer: ChainTimer,
    #[cfg(feature = "rtrb")]
    commands: Option<Consumer<EnvelopeCommand>>,
}

impl ChainEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment after everything already added.
    ///
    /// Segments play in insertion order; no sorting happens here.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Builder-style `add_segment`.
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.add_segment(segment);
        self
    }

    /// Force-advance: drop the current hold, or move past the current
    /// segment. Lets a caller break out of an infinite leg, or pick up a
    /// segment added after the list was exhausted.
    pub fn next_segment(&mut self) {
        if self.hold.take().is_none() {
            self.cursor += 1;
        }
    }

    /// Rewind to the first segment and time zero.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.hold = None;
        self.timer.reset();
    }

    /// Current clock position in nanoseconds.
    pub fn time_ns(&self) -> i64 {
        self.timer.time_ns()
    }

    /// Create a command handle for this sequencer.
    ///
    /// Commands are applied at the head of the next process call.
    #[cfg(feature = "rtrb")]
    pub fn handle(&mut self) -> ChainEnvelopeHandle {
        let (tx, rx) = RingBuffer::<EnvelopeCommand>::new(COMMAND_QUEUE_SIZE);
        self.commands = Some(rx);
        ChainEnvelopeHandle { tx }
    }

    #[cfg(feature = "rtrb")]
    fn drain_commands(&mut self) {
        let Some(rx) = self.commands.as_mut() else {
            return;
        };
        while let Ok(command) = rx.pop() {
            match command {
                EnvelopeCommand::Advance => {
                    if self.hold.take().is_none() {
                        self.cursor += 1;
                    }
                }
                EnvelopeCommand::Reset => {
                    self.cursor = 0;
                    self.hold = None;
                    self.timer.reset();
                }
            }
        }
    }

    /// Resolve the segment supplying values at time `t`, advancing the
    /// cursor past anything finished and materialising holds as needed.
    fn current_segment(&mut self, t: i64) -> Segment {
        loop {
            if let Some(hold) = self.hold {
                if hold.is_infinite() || t < hold.stop_time {
                    return hold;
                }
                // Hold expired, fall through to the pending segment.
                self.hold = None;
            }

            let Some(seg) = self.segments.get(self.cursor).copied() else {
                // List exhausted: the last value holds forever.
                let value = self
                    .segments
                    .last()
                    .map(|s| if s.is_infinite() { s.start_value } else { s.stop_value })
                    .unwrap_or(0.0);
                trace!(value, "segments exhausted, holding");
                let hold = Segment::constant(value);
                self.hold = Some(hold);
                return hold;
            };

            if t < seg.start_time {
                // Gap before the segment: hold the previous stop value.
                let value = if self.cursor == 0 {
                    seg.start_value
                } else {
                    self.segments[self.cursor - 1].stop_value
                };
                let mut hold = Segment::constant(value);
                hold.stop_time = seg.start_time;
                self.hold = Some(hold);
                return hold;
            }

            if !seg.is_infinite() && t >= seg.stop_time {
                trace!(cursor = self.cursor, "segment finished");
                self.cursor += 1;
                continue;
            }

            return seg;
        }
    }
}

impl AudioModule for ChainEnvelope {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn start(&mut self) -> Result<(), ChainError> {
        self.core.info.channels = 1;
        self.cursor = 0;
        self.hold = None;
        self.timer = ChainTimer::new(self.core.info.sample_rate);
        Ok(())
    }

    fn process(&mut self, _input: Option<SampleBuffer>) -> Result<(), ChainError> {
        #[cfg(feature = "rtrb")]
        self.drain_commands();

        let mut buff = self.create_buffer();
        let frames = buff.frames();
        let mut filled = 0;

        while filled < frames {
            let t = self.timer.time_ns();
            let seg = self.current_segment(t);

            // Fill up to the segment boundary or the end of the buffer,
            // whichever comes first.
            let run = if seg.is_infinite() {
                frames - filled
            } else {
                (frames - filled).min(self.timer.frames_until(seg.stop_time) as usize)
            };

            let out = buff.channel_mut(0);
            for sample in &mut out[filled..filled + run] {
                *sample = seg.value_at(self.timer.time_ns());
                self.timer.tick();
            }
            filled += run;
        }

        self.set_buffer(buff);
        Ok(())
    }
}
