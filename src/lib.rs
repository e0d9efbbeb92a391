//! # SDG Emulator
//!
//! Emulates the text command protocol of Siglent SDG1000X-series function
//! generators so that client software can be exercised without hardware.
//!
//! ## Crate Structure
//!
//! - **`numeric`**: number parsing, formatting and the rounding-stable arithmetic used
//!   for derived values.
//! - **`verbs`**: translation between long and short command verbs, and reply header
//!   shaping for the `CHDR` modes.
//! - **`function_generator`**: the instrument state. Per-channel `OUTP`/`BSWV`
//!   handling, device-level commands and the supported models.
//! - **`engine`**: one command line in, one reply out. [`engine::SharedEngine`] lets
//!   many connections drive the same instrument.
//! - **`network`**: the TCP listener and line framing.
//! - **`client`**: a small TCP client and the interactive console.
//! - **`verify`**: compares the emulator against real hardware command by command.
//! - **`config`**, **`logging`**, **`error`**: ambient infrastructure.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod function_generator;
pub mod logging;
pub mod network;
pub mod numeric;
pub mod verbs;
pub mod verify;

pub use engine::{Engine, SharedEngine};
pub use error::{AppResult, EmulatorError};
