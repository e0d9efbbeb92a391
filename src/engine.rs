//! Command engine facade.
//!
//! [`Engine::process`] is the single entry point of the transport: one command
//! line in, one reply out (empty when nothing is to be sent). Each call
//! normalises the command to short verbs, dispatches it to the device, and shapes
//! the reply's verb token according to the device's `CHDR` mode.
//!
//! The engine is synchronous and performs no I/O. When several connections drive
//! the same instrument, wrap it in a [`SharedEngine`], which serialises every
//! command behind one lock.

use crate::error::AppResult;
use crate::function_generator::{Device, InstrumentModel, Response};
use crate::verbs;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Engine {
    device: Device,
}

impl Engine {
    /// Build an engine for a model identifier such as `"sdg1032x"`.
    ///
    /// Unknown identifiers fail immediately with
    /// [`EmulatorError::UnknownModel`](crate::error::EmulatorError::UnknownModel).
    pub fn new(model: &str) -> AppResult<Self> {
        Ok(Self::with_model(model.parse()?))
    }

    pub fn with_model(model: InstrumentModel) -> Self {
        Self {
            device: Device::new(model),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Process one command line and return the reply text.
    pub fn process(&mut self, command: &str) -> String {
        let normalized = verbs::shorten(&command.trim().to_ascii_uppercase());
        let reply = match self.device.dispatch(&normalized) {
            Response::Silent => String::new(),
            Response::Headed(text) => verbs::format(&text, self.device.header_mode()),
            Response::Bare(text) => text,
        };
        trace!(command = %normalized, reply = %reply, "Processed command");
        reply
    }
}

/// An [`Engine`] shared between connections.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Process one command while holding the engine lock.
    pub fn process(&self, command: &str) -> String {
        self.inner.lock().process(command)
    }

    pub fn model(&self) -> InstrumentModel {
        self.inner.lock().device().model()
    }
}

impl From<Engine> for SharedEngine {
    fn from(engine: Engine) -> Self {
        Self::new(engine)
    }
}
