//! Emulated Siglent SDG function generator.
//!
//! - **`defaults`**: immutable power-on snapshots.
//! - **`settings`**: the ordered key/value store both state models are built on.
//! - **`channel`**: per-output state and the `OUTP` / `BSWV` handlers.
//! - **`device`**: device-wide state, device-level handlers and command routing.
//! - **`model`**: the supported model variants and their identification strings.

pub mod channel;
pub mod defaults;
pub mod device;
pub mod model;
pub mod settings;

pub use channel::Channel;
pub use device::Device;
pub use model::InstrumentModel;
pub use settings::Settings;

/// Number of output channels on every supported model.
pub const CHANNEL_COUNT: usize = 2;

/// Raw reply of a command handler, before header-mode shaping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Response {
    /// No reply is sent.
    #[default]
    Silent,
    /// Reply that starts with its own verb token (`C1:OUTP OFF,...`).
    Headed(String),
    /// Reply sent verbatim (`*IDN?`).
    Bare(String),
}

impl Response {
    pub fn is_silent(&self) -> bool {
        matches!(self, Response::Silent)
    }
}
