//! Flatten a built command into the argument vector passed to ffmpeg.

use serde::Serialize;
use std::fmt;

use crate::command::{FfmpegCommand, InputSource, OutputTarget};

/// Location ffmpeg reads a stream input from
pub const STDIN_PIPE: &str = "pipe:0";
/// Location ffmpeg writes a stream output to
pub const STDOUT_PIPE: &str = "pipe:1";

/// Build ffmpeg arguments from a command.
///
/// Each input contributes its options followed by `-i <source>`. Each output with a target
/// contributes audio options, audio filters (`-filter:a`), video options, video and size
/// filters (`-filter:v`), generic options and finally the target. The untargeted
/// placeholder output is skipped.
pub fn build_args(command: &FfmpegCommand) -> Vec<String> {
    let mut args = Vec::new();

    for input in command.inputs() {
        args.extend(input.options().iter().cloned());
        args.push("-i".to_string());
        args.push(match input.source() {
            InputSource::Url(url) => url.clone(),
            InputSource::Stream(_) => STDIN_PIPE.to_string(),
        });
    }

    for output in command.outputs() {
        let Some(target) = output.target() else {
            continue;
        };

        args.extend(output.audio().iter().cloned());
        if !output.audio_filters().is_empty() {
            args.push("-filter:a".to_string());
            args.push(output.audio_filters().as_slice().join(","));
        }

        args.extend(output.video().iter().cloned());
        let video_filters: Vec<&str> = output
            .video_filters()
            .iter()
            .chain(output.size_filters().iter())
            .map(String::as_str)
            .collect();
        if !video_filters.is_empty() {
            args.push("-filter:v".to_string());
            args.push(video_filters.join(","));
        }

        args.extend(output.options().iter().cloned());
        args.push(match target {
            OutputTarget::Url(url) => url.clone(),
            OutputTarget::Stream(_) => STDOUT_PIPE.to_string(),
        });
    }

    args
}

/// A program and its arguments, ready to hand to a process runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<S: Into<String>>(program: S, command: &FfmpegCommand) -> Self {
        Self {
            program: program.into(),
            args: build_args(command),
        }
    }
}

impl fmt::Display for CommandLine {
    /// Shell-quoted form, for logs and previews
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(self.args.iter());
        write!(f, "{}", shell_words::join(words))
    }
}
