//! The module chain protocol: configuration info, the `AudioModule` trait,
//! and the `Chain` driver that pulls buffers through a line of modules.

pub mod meta;
pub mod mix;

use tracing::debug;

use crate::buffer::SampleBuffer;

pub use crate::error::ChainError;

/*
Module Chains
=============

Audio is produced by chains of modules. The backward-most module is a source
(an oscillator, a stored buffer); every module forward of it transforms the
buffer it is handed. Processing is pull-based: asking the chain to process
walks the modules from back to front, moving each module's output buffer into
the next module's input.

Each module carries a ModuleCore holding its configuration (ModuleInfo) and a
single buffer slot. The slot is an Option: a module that has not produced
output simply holds None, and taking the buffer out leaves None behind. At
most one module owns a given buffer at any time because hand-off is a move.

Configuration flows forward at start time: the chain copies each module's
info into the next module before running that module's start hook, so a
source's sample rate or a custom buffer size set early in the chain is seen
by everything forward of it in the same pass.
*/

/// Configuration shared along a chain.
///
/// Copied wholesale from the backward module into each forward module during
/// the start phase; modules may then adjust their own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per processed buffer.
    pub buffer_size: usize,
    /// Channels per buffer.
    pub channels: usize,
    /// Pitch hint for source modules, in Hz. Zero means "unset".
    pub frequency: f64,
    /// Intensity hint for source modules (0.0 to 1.0).
    pub velocity: f64,
}

impl Default for ModuleInfo {
    fn default() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            buffer_size: crate::DEFAULT_BUFFER_SIZE,
            channels: 1,
            frequency: 0.0,
            velocity: 1.0,
        }
    }
}

/// State every module owns: its configuration and its one buffer slot.
#[derive(Debug, Default)]
pub struct ModuleCore {
    pub info: ModuleInfo,
    pub slot: Option<SampleBuffer>,
}

impl ModuleCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(info: ModuleInfo) -> Self {
        Self { info, slot: None }
    }
}

/// A processing stage in a chain.
///
/// Implementors provide access to their `ModuleCore` and a `process` hook;
/// everything else has a default. `process` receives the backward module's
/// buffer by move (or `None` for source modules) and must leave its own
/// output in the slot via `set_buffer`.
pub trait AudioModule: Send {
    fn core(&self) -> &ModuleCore;

    fn core_mut(&mut self) -> &mut ModuleCore;

    fn info(&self) -> &ModuleInfo {
        &self.core().info
    }

    fn info_mut(&mut self) -> &mut ModuleInfo {
        &mut self.core_mut().info
    }

    /// Place a buffer in this module's slot.
    fn set_buffer(&mut self, buff: SampleBuffer) {
        self.core_mut().slot = Some(buff);
    }

    /// Move the buffer out of this module's slot, leaving it empty.
    fn get_buffer(&mut self) -> Option<SampleBuffer> {
        self.core_mut().slot.take()
    }

    /// Allocate a silent buffer matching this module's configuration.
    fn create_buffer(&self) -> SampleBuffer {
        let info = self.info();
        SampleBuffer::silence(info.buffer_size, info.channels)
    }

    /// Allocate a silent buffer with an explicit shape.
    fn create_buffer_sized(&self, frames: usize, channels: usize) -> SampleBuffer {
        SampleBuffer::silence(frames, channels)
    }

    /// Called once before processing begins, after info propagation.
    fn start(&mut self) -> Result<(), ChainError> {
        Ok(())
    }

    /// Called once when the chain shuts down.
    fn stop(&mut self) -> Result<(), ChainError> {
        Ok(())
    }

    /// Produce this module's output for one buffer of audio.
    fn process(&mut self, input: Option<SampleBuffer>) -> Result<(), ChainError>;
}

/// Allow boxed modules to be used as modules (for dynamic dispatch).
impl AudioModule for Box<dyn AudioModule> {
    fn core(&self) -> &ModuleCore {
        (**self).core()
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        (**self).core_mut()
    }

    fn start(&mut self) -> Result<(), ChainError> {
        (**self).start()
    }

    fn stop(&mut self) -> Result<(), ChainError> {
        (**self).stop()
    }

    fn process(&mut self, input: Option<SampleBuffer>) -> Result<(), ChainError> {
        (**self).process(input)
    }
}

/// An ordered line of modules, backward-most first.
///
/// The chain owns its modules outright, so the traversal is a plain forward
/// walk over a `Vec` and reference cycles cannot be built.
#[derive(Default)]
pub struct Chain {
    modules: Vec<Box<dyn AudioModule>>,
    output: Option<SampleBuffer>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module forward of everything already bound.
    pub fn bind(&mut self, module: impl AudioModule + 'static) {
        self.modules.push(Box::new(module));
    }

    /// Builder-style `bind`.
    pub fn with(mut self, module: impl AudioModule + 'static) -> Self {
        self.bind(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Start every module, back to front, propagating configuration forward.
    ///
    /// Each module's info is copied from the module behind it before its own
    /// start hook runs, so a hook that overrides a field (say, a custom
    /// buffer size) is seen by every module forward of it in the same pass.
    pub fn start(&mut self) -> Result<(), ChainError> {
        debug!(modules = self.modules.len(), "starting chain");
        let mut carried: Option<ModuleInfo> = None;
        for module in &mut self.modules {
            if let Some(info) = carried {
                *module.info_mut() = info;
            }
            module.start()?;
            carried = Some(*module.info());
        }
        Ok(())
    }

    /// Stop every module, back to front.
    pub fn stop(&mut self) -> Result<(), ChainError> {
        debug!(modules = self.modules.len(), "stopping chain");
        for module in &mut self.modules {
            module.stop()?;
        }
        Ok(())
    }

    /// Pull one buffer through the chain.
    pub fn process(&mut self) -> Result<(), ChainError> {
        self.process_with(None)
    }

    /// Pull one buffer through the chain, seeding the backward-most module
    /// with `seed` as its input.
    pub fn process_with(&mut self, seed: Option<SampleBuffer>) -> Result<(), ChainError> {
        if self.modules.is_empty() {
            return Err(ChainError::EmptyChain);
        }

        let mut carried = seed;
        for module in &mut self.modules {
            module.process(carried.take())?;
            // A module that produced nothing breaks the hand-off chain.
            carried = Some(module.get_buffer().ok_or(ChainError::MissingBuffer)?);
        }
        self.output = carried;
        Ok(())
    }

    /// Move the most recent output buffer out of the chain.
    pub fn take_output(&mut self) -> Option<SampleBuffer> {
        self.output.take()
    }

    /// Configuration of the forward-most module, if any.
    pub fn info(&self) -> Option<&ModuleInfo> {
        self.modules.last().map(|m| m.info())
    }

    /// Mutable configuration of the backward-most module.
    ///
    /// Useful for setting chain-wide fields before `start` propagates them.
    pub fn source_info_mut(&mut self) -> Option<&mut ModuleInfo> {
        self.modules.first_mut().map(|m| m.info_mut())
    }
}
