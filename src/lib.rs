//! Typing practice, guided lessons and a falling-word chase game.
//!
//! The library holds the session logic and is driven entirely by keystrokes
//! and elapsed seconds; the `keychase` binary is one terminal host for it.

pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod keyboard;
pub mod session;
