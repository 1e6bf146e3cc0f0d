//! Fixed-shooter game core.
//!
//! - `geometry`: axis-aligned boxes and overlap tests
//! - `entities`: player, bullet, enemy and session state — pure data
//! - `formation`: enemy grid spawn and lockstep march
//! - `compute`: per-frame state machine
//! - `input`: keyboard / mouse-zone events → command state
//! - `display`: read-only rendering onto a `Surface`
//! - `config`, `error`: runtime settings and I/O errors

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod formation;
pub mod geometry;
pub mod input;

pub use config::Config;
pub use error::GameError;
