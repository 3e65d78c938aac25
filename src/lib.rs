//! ffcompose - Fluent ffmpeg command builder
//!
//! Describe multi-input, multi-output ffmpeg jobs through a chainable API and render
//! them into a validated argument vector.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod preset;
pub mod render;
pub mod stream;

pub use command::FfmpegCommand;
pub use error::{FfcomposeError, Result};
