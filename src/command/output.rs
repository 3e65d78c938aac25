use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{is_file_location, ArgList, FfmpegCommand};
use crate::error::{FfcomposeError, Result};
use crate::stream::MediaStream;

static RE_STREAM_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[?(.*?)\]?$").unwrap());

/// Flag requesting an flvmeta pass over the finished output
pub const FLAG_FLVMETA: &str = "flvmeta";

/// Where an output writes to
#[derive(Clone)]
pub enum OutputTarget {
    /// File path or URL handed to ffmpeg as is
    Url(String),
    /// Writable stream fed from ffmpeg's stdout
    Stream(Arc<dyn MediaStream>),
}

impl OutputTarget {
    pub fn is_stream(&self) -> bool {
        matches!(self, OutputTarget::Stream(_))
    }
}

impl fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Url(url) => f.debug_tuple("Url").field(url).finish(),
            OutputTarget::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&str> for OutputTarget {
    fn from(value: &str) -> Self {
        OutputTarget::Url(value.to_string())
    }
}

impl From<String> for OutputTarget {
    fn from(value: String) -> Self {
        OutputTarget::Url(value)
    }
}

impl From<&Path> for OutputTarget {
    fn from(value: &Path) -> Self {
        OutputTarget::Url(value.to_string_lossy().to_string())
    }
}

impl From<PathBuf> for OutputTarget {
    fn from(value: PathBuf) -> Self {
        OutputTarget::from(value.as_path())
    }
}

impl From<Arc<dyn MediaStream>> for OutputTarget {
    fn from(value: Arc<dyn MediaStream>) -> Self {
        OutputTarget::Stream(value)
    }
}

/// Options for piping ffmpeg's stdout into a stream target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeOptions {
    /// Whether the sink should be ended once ffmpeg's output ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<bool>,
}

/// A registered output with its categorized option tokens
#[derive(Debug, Clone)]
pub struct Output {
    target: Option<OutputTarget>,
    is_file: bool,
    pipe_options: PipeOptions,
    pub(super) flags: BTreeMap<String, bool>,
    pub(super) options: ArgList,
    pub(super) audio: ArgList,
    pub(super) audio_filters: ArgList,
    pub(super) video: ArgList,
    pub(super) video_filters: ArgList,
    pub(super) size_filters: ArgList,
}

impl Output {
    /// Output created with the command, before any target is known
    pub(super) fn placeholder() -> Self {
        Self {
            target: None,
            is_file: false,
            pipe_options: PipeOptions::default(),
            flags: BTreeMap::new(),
            options: ArgList::new(),
            audio: ArgList::new(),
            audio_filters: ArgList::new(),
            video: ArgList::new(),
            video_filters: ArgList::new(),
            size_filters: ArgList::new(),
        }
    }

    fn set_target(&mut self, target: OutputTarget, is_file: bool, pipe_options: PipeOptions) {
        self.target = Some(target);
        self.is_file = is_file;
        self.pipe_options = pipe_options;
    }

    pub fn target(&self) -> Option<&OutputTarget> {
        self.target.as_ref()
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn pipe_options(&self) -> &PipeOptions {
        &self.pipe_options
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn options(&self) -> &ArgList {
        &self.options
    }

    pub fn audio(&self) -> &ArgList {
        &self.audio
    }

    pub fn audio_filters(&self) -> &ArgList {
        &self.audio_filters
    }

    pub fn video(&self) -> &ArgList {
        &self.video
    }

    pub fn video_filters(&self) -> &ArgList {
        &self.video_filters
    }

    pub fn size_filters(&self) -> &ArgList {
        &self.size_filters
    }
}

impl FfmpegCommand {
    /// Add an output and make it the current output.
    ///
    /// The first call fills in the placeholder output created with the command, so
    /// options set before it apply to this target.
    pub fn output<T: Into<OutputTarget>>(&mut self, target: T) -> Result<&mut Self> {
        self.add_output(Some(target.into()), PipeOptions::default())
    }

    /// Add an output, with pipe options for a stream target
    pub fn output_with_pipe_options<T: Into<OutputTarget>>(
        &mut self,
        target: T,
        pipe_options: PipeOptions,
    ) -> Result<&mut Self> {
        self.add_output(Some(target.into()), pipe_options)
    }

    /// Add an output. A missing or empty target is only valid for the placeholder
    /// created with the command, so it is always rejected here.
    pub fn add_output(
        &mut self,
        target: Option<OutputTarget>,
        pipe_options: PipeOptions,
    ) -> Result<&mut Self> {
        let target = match target {
            Some(OutputTarget::Url(url)) if url.is_empty() => None,
            other => other,
        };

        let Some(target) = target else {
            return Err(FfcomposeError::InvalidOutput(
                "an output target is required".to_string(),
            ));
        };

        let is_file = match &target {
            OutputTarget::Stream(stream) => {
                if !stream.writable() {
                    return Err(FfcomposeError::InvalidOutput(
                        "stream target is not writable".to_string(),
                    ));
                }
                if self
                    .outputs
                    .iter()
                    .any(|output| output.target.as_ref().is_some_and(OutputTarget::is_stream))
                {
                    return Err(FfcomposeError::DuplicateStreamOutput);
                }
                false
            }
            OutputTarget::Url(url) => is_file_location(url),
        };

        let current = self.current_output_mut();
        if current.target.is_none() {
            debug!("Setting target of placeholder output: {:?}", target);
            current.set_target(target, is_file, pipe_options);
        } else {
            debug!("Adding output #{}: {:?}", self.outputs.len(), target);
            let mut output = Output::placeholder();
            output.set_target(target, is_file, pipe_options);
            self.outputs.push(output);
            self.current_output = self.outputs.len() - 1;
        }

        Ok(self)
    }

    /// Seek in the current output, in seconds or `[[hh:]mm:]ss[.xxx]` (`-ss`)
    pub fn seek<T: fmt::Display>(&mut self, seek: T) -> &mut Self {
        self.current_output_mut()
            .options
            .append(["-ss".to_string(), seek.to_string()]);
        self
    }

    /// Limit the duration of the current output (`-t`)
    pub fn duration<T: fmt::Display>(&mut self, duration: T) -> &mut Self {
        self.current_output_mut()
            .options
            .append(["-t".to_string(), duration.to_string()]);
        self
    }

    /// Force the format of the current output (`-f`)
    pub fn format<S: Into<String>>(&mut self, format: S) -> &mut Self {
        self.current_output_mut()
            .options
            .append(["-f".to_string(), format.into()]);
        self
    }

    /// Map a stream or filtergraph label into the current output (`-map [spec]`).
    /// Brackets around `spec` are optional.
    pub fn map(&mut self, spec: &str) -> &mut Self {
        let spec = RE_STREAM_SPEC.replace(spec, "[$1]").into_owned();
        self.current_output_mut().options.append(["-map".to_string(), spec]);
        self
    }

    /// Request an flvmeta pass over the current output once ffmpeg is done
    pub fn flvmeta(&mut self) -> &mut Self {
        self.current_output_mut()
            .flags
            .insert(FLAG_FLVMETA.to_string(), true);
        self
    }
}
