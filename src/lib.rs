//! padlink - WebSocket bridge between a phone controller app and a host
//!
//! A single client drives virtual widgets (joystick, color picker, button
//! array, slider) over comma-separated text frames. The host reads the latest
//! widget samples, picks up queued serial commands and prints lines back on
//! the client's monitor.

pub mod cli;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod network;
pub mod paths;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod widgets;
