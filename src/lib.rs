// src/lib.rs
//
// Core state layer for Relay, a multi-window desktop chat client.
//
// The platform shell owns window creation, webview hosting, toast display,
// and where preference files live. This crate owns the state that has to
// move between windows: handoff records for popped-out tabs, default window
// content resolution, and the foreground notification bridge.

#[macro_use]
mod logging;

pub mod channels;
pub mod content;
pub mod handoff;
pub mod notifications;
pub mod settings;
pub mod windows;

pub use logging::{init_file_logging, stop_file_logging};
