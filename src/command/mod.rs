// Fluent ffmpeg command builder
//
// The command is split by option category, each file adding methods to `FfmpegCommand`:
// - input: input registry and input-scoped options
// - output: output registry and generic output options
// - audio / video: codec, bitrate and filter options of the current output
// - custom: free-form input and output options

pub mod args;
pub mod audio;
pub mod custom;
pub mod filter;
pub mod input;
pub mod output;
pub mod video;

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub use args::ArgList;
pub use filter::{make_filter_strings, FilterDescriptor, FilterOptions, FilterSpec};
pub use input::{Input, InputSource};
pub use output::{Output, OutputTarget, PipeOptions};

use crate::config::Config;
use crate::error::{FfcomposeError, Result};
use crate::preset::{BuiltinPresets, PresetChain, PresetDirectory, PresetResolver};

static RE_PROTOCOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^([a-z]{2,}):").unwrap());

/// Whether a location string refers to a local file: no protocol prefix, or `file:`
pub(crate) fn is_file_location(location: &str) -> bool {
    match RE_PROTOCOL.captures(location) {
        Some(caps) => &caps[1] == "file",
        None => true,
    }
}

/// An ffmpeg job under construction: ordered inputs and outputs plus the
/// input and output that subsequent option calls apply to.
///
/// A placeholder output without a target exists from construction on, so
/// single-output jobs can set output options before naming the output.
#[derive(Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    current_input: Option<usize>,
    current_output: usize,
    presets: Arc<dyn PresetResolver>,
}

impl FfmpegCommand {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: vec![Output::placeholder()],
            current_input: None,
            current_output: 0,
            presets: Arc::new(BuiltinPresets),
        }
    }

    /// Create a command whose named presets resolve against the built-in set and,
    /// when configured, the preset directory.
    pub fn with_config(config: &Config) -> Self {
        let mut chain = PresetChain::new().with(Arc::new(BuiltinPresets));
        if let Some(dir) = &config.presets.directory {
            chain = chain.with(Arc::new(PresetDirectory::new(dir)));
        }
        Self::new().with_preset_resolver(Arc::new(chain))
    }

    /// Replace the collaborator used to resolve named presets
    pub fn with_preset_resolver(mut self, resolver: Arc<dyn PresetResolver>) -> Self {
        self.presets = resolver;
        self
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn current_input(&self) -> Option<&Input> {
        self.current_input.map(|index| &self.inputs[index])
    }

    pub fn current_output(&self) -> &Output {
        &self.outputs[self.current_output]
    }

    pub(crate) fn current_input_mut(&mut self) -> Result<&mut Input> {
        match self.current_input {
            Some(index) => Ok(&mut self.inputs[index]),
            None => Err(FfcomposeError::NoCurrentInput),
        }
    }

    pub(crate) fn current_output_mut(&mut self) -> &mut Output {
        &mut self.outputs[self.current_output]
    }

    /// Apply a named preset resolved through the configured resolver.
    ///
    /// Resolution and load failures are reported as `PresetLoad`; the command is
    /// left as it was before the call.
    pub fn preset(&mut self, name: &str) -> Result<&mut Self> {
        debug!("Resolving preset {}", name);

        let preset = match self.presets.resolve(name) {
            Ok(Some(preset)) => preset,
            Ok(None) => {
                return Err(FfcomposeError::preset_load(
                    name,
                    format!("no preset named {name}"),
                ));
            }
            Err(e) => return Err(FfcomposeError::preset_load(name, e)),
        };

        let snapshot = self.clone();
        if let Err(e) = preset.load(self) {
            *self = snapshot;
            return Err(FfcomposeError::preset_load(name, e));
        }

        debug!("Applied preset {}", name);
        Ok(self)
    }

    /// Apply a caller-supplied preset function. Its error is returned unchanged and
    /// the command is left as it was before the call.
    pub fn apply<F>(&mut self, preset: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let snapshot = self.clone();
        if let Err(e) = preset(self) {
            *self = snapshot;
            return Err(e);
        }
        Ok(self)
    }
}

impl Default for FfmpegCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FfmpegCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FfmpegCommand")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("current_input", &self.current_input)
            .field("current_output", &self.current_output)
            .finish_non_exhaustive()
    }
}
