use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{is_file_location, ArgList, FfmpegCommand};
use crate::error::{FfcomposeError, Result};
use crate::stream::MediaStream;

/// Where an input reads from
#[derive(Clone)]
pub enum InputSource {
    /// File path or URL handed to ffmpeg as is
    Url(String),
    /// Readable stream piped to ffmpeg's stdin
    Stream(Arc<dyn MediaStream>),
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            InputSource::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&str> for InputSource {
    fn from(value: &str) -> Self {
        InputSource::Url(value.to_string())
    }
}

impl From<String> for InputSource {
    fn from(value: String) -> Self {
        InputSource::Url(value)
    }
}

impl From<&Path> for InputSource {
    fn from(value: &Path) -> Self {
        InputSource::Url(value.to_string_lossy().to_string())
    }
}

impl From<PathBuf> for InputSource {
    fn from(value: PathBuf) -> Self {
        InputSource::from(value.as_path())
    }
}

impl From<Arc<dyn MediaStream>> for InputSource {
    fn from(value: Arc<dyn MediaStream>) -> Self {
        InputSource::Stream(value)
    }
}

/// A registered input and its option tokens
#[derive(Debug, Clone)]
pub struct Input {
    source: InputSource,
    is_file: bool,
    is_stream: bool,
    pub(super) options: ArgList,
}

impl Input {
    pub fn source(&self) -> &InputSource {
        &self.source
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn is_stream(&self) -> bool {
        self.is_stream
    }

    pub fn options(&self) -> &ArgList {
        &self.options
    }
}

impl FfmpegCommand {
    /// Add an input and make it the current input.
    ///
    /// Only one stream input is supported. A stream source is paused as soon as it
    /// is registered.
    pub fn input<S: Into<InputSource>>(&mut self, source: S) -> Result<&mut Self> {
        let source = source.into();

        let (is_file, is_stream) = match &source {
            InputSource::Stream(stream) => {
                if !stream.readable() {
                    return Err(FfcomposeError::InvalidInput(
                        "stream source is not readable".to_string(),
                    ));
                }
                if self.inputs.iter().any(|input| input.is_stream) {
                    return Err(FfcomposeError::DuplicateStreamInput);
                }
                stream.pause();
                (false, true)
            }
            InputSource::Url(url) => (is_file_location(url), false),
        };

        debug!("Adding input #{}: {:?}", self.inputs.len(), source);

        self.inputs.push(Input {
            source,
            is_file,
            is_stream,
            options: ArgList::new(),
        });
        self.current_input = Some(self.inputs.len() - 1);

        Ok(self)
    }

    /// Force the format of the current input (`-f`)
    pub fn input_format<S: Into<String>>(&mut self, format: S) -> Result<&mut Self> {
        self.current_input_mut()?
            .options
            .append(["-f".to_string(), format.into()]);
        Ok(self)
    }

    /// Set the frame rate of the current input (`-r`); only meaningful for raw formats
    pub fn input_fps<T: fmt::Display>(&mut self, fps: T) -> Result<&mut Self> {
        self.current_input_mut()?
            .options
            .append(["-r".to_string(), fps.to_string()]);
        Ok(self)
    }

    /// Read the current input at its native frame rate (`-re`)
    pub fn native(&mut self) -> Result<&mut Self> {
        self.current_input_mut()?.options.push("-re");
        Ok(self)
    }

    /// Seek the current input, in seconds or `[[hh:]mm:]ss[.xxx]` (`-ss`)
    pub fn seek_input<T: fmt::Display>(&mut self, seek: T) -> Result<&mut Self> {
        self.current_input_mut()?
            .options
            .append(["-ss".to_string(), seek.to_string()]);
        Ok(self)
    }

    /// Loop over the current input (`-loop 1`)
    pub fn loop_input(&mut self) -> Result<&mut Self> {
        self.current_input_mut()?.options.append(["-loop", "1"]);
        Ok(self)
    }

    /// Loop over the current input for a fixed time.
    ///
    /// The duration limits the current output (`-t`), not the input itself.
    pub fn loop_input_for<T: fmt::Display>(&mut self, duration: T) -> Result<&mut Self> {
        self.loop_input()?;
        Ok(self.duration(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MockMediaStream;

    fn readable_stream() -> Arc<dyn MediaStream> {
        let mut stream = MockMediaStream::new();
        stream.expect_readable().return_const(true);
        stream.expect_pause().times(1).return_const(());
        Arc::new(stream)
    }

    #[test]
    fn test_input_classification() {
        let mut command = FfmpegCommand::new();
        command
            .input("movie.mp4")
            .unwrap()
            .input("http://example.com/live.m3u8")
            .unwrap()
            .input("file:clip.mov")
            .unwrap();

        let inputs = command.inputs();
        assert!(inputs[0].is_file());
        assert!(!inputs[1].is_file());
        assert!(inputs[2].is_file());
        assert!(inputs.iter().all(|input| !input.is_stream()));
    }

    #[test]
    fn test_stream_input_is_paused() {
        let mut command = FfmpegCommand::new();
        command.input(readable_stream()).unwrap();

        let input = command.current_input().unwrap();
        assert!(input.is_stream());
        assert!(!input.is_file());
    }

    #[test]
    fn test_unreadable_stream_is_rejected() {
        let mut stream = MockMediaStream::new();
        stream.expect_readable().return_const(false);
        stream.expect_pause().never();
        let stream: Arc<dyn MediaStream> = Arc::new(stream);

        let mut command = FfmpegCommand::new();
        let err = command.input(stream).unwrap_err();
        assert!(matches!(err, FfcomposeError::InvalidInput(_)));
        assert!(command.inputs().is_empty());
    }

    #[test]
    fn test_second_stream_input_is_rejected() {
        let mut command = FfmpegCommand::new();
        command.input(readable_stream()).unwrap();

        let mut second = MockMediaStream::new();
        second.expect_readable().return_const(true);
        second.expect_pause().never();
        let second: Arc<dyn MediaStream> = Arc::new(second);

        let err = command.input(second).unwrap_err();
        assert!(matches!(err, FfcomposeError::DuplicateStreamInput));
        assert_eq!(command.inputs().len(), 1);
    }

    #[test]
    fn test_input_options_target_current_input() {
        let mut command = FfmpegCommand::new();
        command
            .input("a.raw")
            .unwrap()
            .input_format("rawvideo")
            .unwrap()
            .input_fps(25)
            .unwrap()
            .input("b.mp4")
            .unwrap()
            .native()
            .unwrap()
            .seek_input("00:01:30")
            .unwrap();

        assert_eq!(
            command.inputs()[0].options().as_slice(),
            &["-f", "rawvideo", "-r", "25"]
        );
        assert_eq!(
            command.inputs()[1].options().as_slice(),
            &["-re", "-ss", "00:01:30"]
        );
    }

    #[test]
    fn test_input_options_require_an_input() {
        let mut command = FfmpegCommand::new();

        assert!(matches!(
            command.input_format("mp4"),
            Err(FfcomposeError::NoCurrentInput)
        ));
        assert!(matches!(command.input_fps(30), Err(FfcomposeError::NoCurrentInput)));
        assert!(matches!(command.native(), Err(FfcomposeError::NoCurrentInput)));
        assert!(matches!(command.seek_input(10), Err(FfcomposeError::NoCurrentInput)));
        assert!(matches!(command.loop_input(), Err(FfcomposeError::NoCurrentInput)));
        assert!(matches!(
            command.loop_input_for(5),
            Err(FfcomposeError::NoCurrentInput)
        ));

        assert!(command.inputs().is_empty());
        assert!(command.current_output().options().is_empty());
    }

    #[test]
    fn test_loop_duration_goes_to_output() {
        let mut command = FfmpegCommand::new();
        command.input("still.png").unwrap().loop_input_for(10).unwrap();

        assert_eq!(command.inputs()[0].options().as_slice(), &["-loop", "1"]);
        assert_eq!(command.current_output().options().as_slice(), &["-t", "10"]);
    }
}
