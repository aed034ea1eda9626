//! Many-to-one and one-to-many chain junctions.

use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::chain::{AudioModule, Chain, ChainError, ModuleCore};

/*
Mixers
======

Chains are strictly linear, so fan-in and fan-out live in dedicated
junctions.

MixDown owns a set of whole input chains and behaves as a source module:
each process call pulls one buffer from every input chain, checks that the
shapes agree, and sums them sample-by-sample into a fresh output buffer. A
shape mismatch is an error before any summing happens, never a partial mix.

MixUp is the opposite junction and drives whole chains rather than sitting
inside one: it pulls a buffer from its source chain and seeds every output
chain with an independent copy, so each tap transforms its own buffer
without aliasing the others.
*/

/// Sums the output of several chains into one buffer. Acts as a source.
#[derive(Default)]
pub struct MixDown {
    core: ModuleCore,
    inputs: Vec<Chain>,
}

impl MixDown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an input chain.
    pub fn attach(&mut self, chain: Chain) {
        self.inputs.push(chain);
    }

    /// Builder-style `attach`.
    pub fn with(mut self, chain: Chain) -> Self {
        self.attach(chain);
        self
    }

    pub fn inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl AudioModule for MixDown {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn start(&mut self) -> Result<(), ChainError> {
        debug!(inputs = self.inputs.len(), "starting mixdown inputs");
        for chain in &mut self.inputs {
            if let Some(info) = chain.source_info_mut() {
                *info = self.core.info;
            }
            chain.start()?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ChainError> {
        for chain in &mut self.inputs {
            chain.stop()?;
        }
        Ok(())
    }

    fn process(&mut self, _input: Option<SampleBuffer>) -> Result<(), ChainError> {
        let mut mixed = self.create_buffer();

        for chain in &mut self.inputs {
            chain.process()?;
            let buff = chain.take_output().ok_or(ChainError::MissingBuffer)?;

            if buff.frames() != mixed.frames() || buff.channels() != mixed.channels() {
                return Err(ChainError::BufferMismatch {
                    expected_frames: mixed.frames(),
                    expected_channels: mixed.channels(),
                    frames: buff.frames(),
                    channels: buff.channels(),
                });
            }

            for (out, sample) in mixed.iter_sequential_mut().zip(buff.iter_sequential()) {
                *out += sample;
            }
        }

        self.set_buffer(mixed);
        Ok(())
    }
}

/// Feeds copies of one source chain's output into several output chains.
#[derive(Default)]
pub struct MixUp {
    source: Chain,
    outputs: Vec<Chain>,
}

impl MixUp {
    pub fn new(source: Chain) -> Self {
        Self {
            source,
            outputs: Vec::new(),
        }
    }

    /// Attach an output chain fed from the source.
    pub fn attach(&mut self, chain: Chain) {
        self.outputs.push(chain);
    }

    pub fn with(mut self, chain: Chain) -> Self {
        self.attach(chain);
        self
    }

    pub fn outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn start(&mut self) -> Result<(), ChainError> {
        self.source.start()?;
        let info = self.source.info().copied();
        for chain in &mut self.outputs {
            if let (Some(info), Some(dest)) = (info, chain.source_info_mut()) {
                *dest = info;
            }
            chain.start()?;
        }
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ChainError> {
        self.source.stop()?;
        for chain in &mut self.outputs {
            chain.stop()?;
        }
        Ok(())
    }

    /// Pull one buffer from the source and push a copy through every output.
    pub fn process(&mut self) -> Result<(), ChainError> {
        self.source.process()?;
        let buff = self.source.take_output().ok_or(ChainError::MissingBuffer)?;

        for chain in &mut self.outputs {
            chain.process_with(Some(buff.clone()))?;
        }
        Ok(())
    }

    /// The output buffer of tap `n`, if it produced one.
    pub fn take_output(&mut self, n: usize) -> Option<SampleBuffer> {
        self.outputs.get_mut(n).and_then(Chain::take_output)
    }
}
