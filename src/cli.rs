use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::command::FfmpegCommand;
use crate::config::Config;
use crate::error::Result;
use crate::stream::{MediaStream, StdioPipe};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an ffmpeg command line and print it
    Render(RenderArgs),

    /// List available presets
    Presets,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RenderArgs {
    /// Input file or URL; `-` reads from stdin
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<String>,

    /// Force the format of the last input
    #[arg(long)]
    pub input_format: Option<String>,

    /// Seek the last input before reading
    #[arg(long)]
    pub seek_input: Option<String>,

    /// Output file or URL; `-` writes to stdout
    #[arg(short, long)]
    pub output: String,

    /// Presets applied to the output, in order
    #[arg(short, long = "preset")]
    pub presets: Vec<String>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output seek time
    #[arg(long)]
    pub seek: Option<String>,

    /// Output duration
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Stream specifiers mapped into the output
    #[arg(long = "map")]
    pub maps: Vec<String>,

    #[arg(long)]
    pub no_audio: bool,

    #[arg(long = "acodec")]
    pub audio_codec: Option<String>,

    /// Audio bitrate in kbps
    #[arg(long = "abitrate")]
    pub audio_bitrate: Option<String>,

    #[arg(long = "channels")]
    pub audio_channels: Option<u32>,

    /// Audio sampling frequency in Hz
    #[arg(long = "frequency")]
    pub audio_frequency: Option<u32>,

    #[arg(long = "af")]
    pub audio_filters: Vec<String>,

    #[arg(long)]
    pub no_video: bool,

    #[arg(long = "vcodec")]
    pub video_codec: Option<String>,

    /// Video bitrate in kbps
    #[arg(long = "vbitrate")]
    pub video_bitrate: Option<String>,

    /// Frame size: WxH, Wx?, ?xH or N%
    #[arg(short, long)]
    pub size: Option<String>,

    #[arg(long)]
    pub fps: Option<String>,

    #[arg(long = "vf")]
    pub video_filters: Vec<String>,

    /// Print the command line as JSON
    #[arg(long)]
    pub json: bool,

    /// Extra output options passed through verbatim
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

impl RenderArgs {
    /// Build the command described by these arguments
    pub fn to_command(&self, config: &Config) -> Result<FfmpegCommand> {
        let mut command = FfmpegCommand::with_config(config);

        for input in &self.inputs {
            if input == "-" {
                let stdin: Arc<dyn MediaStream> = Arc::new(StdioPipe::stdin());
                command.input(stdin)?;
            } else {
                command.input(input.as_str())?;
            }
        }
        if let Some(format) = &self.input_format {
            command.input_format(format.as_str())?;
        }
        if let Some(seek) = &self.seek_input {
            command.seek_input(seek)?;
        }

        for preset in &self.presets {
            command.preset(preset)?;
        }

        if let Some(format) = &self.format {
            command.format(format.as_str());
        }
        if let Some(seek) = &self.seek {
            command.seek(seek);
        }
        if let Some(duration) = &self.duration {
            command.duration(duration);
        }
        for spec in &self.maps {
            command.map(spec);
        }

        if self.no_audio {
            command.no_audio();
        } else {
            if let Some(codec) = &self.audio_codec {
                command.audio_codec(codec.as_str());
            }
            if let Some(bitrate) = &self.audio_bitrate {
                command.audio_bitrate(bitrate);
            }
            if let Some(channels) = self.audio_channels {
                command.audio_channels(channels);
            }
            if let Some(frequency) = self.audio_frequency {
                command.audio_frequency(frequency);
            }
            command.audio_filters(&self.audio_filters);
        }

        if self.no_video {
            command.no_video();
        } else {
            if let Some(codec) = &self.video_codec {
                command.video_codec(codec.as_str());
            }
            if let Some(bitrate) = &self.video_bitrate {
                command.video_bitrate(bitrate, false);
            }
            if let Some(size) = &self.size {
                command.size(size)?;
            }
            if let Some(fps) = &self.fps {
                command.fps(fps);
            }
            command.video_filters(&self.video_filters);
        }

        command.output_options(self.extra_args.iter().cloned());

        if self.output == "-" {
            let stdout: Arc<dyn MediaStream> = Arc::new(StdioPipe::stdout());
            command.output(stdout)?;
        } else {
            command.output(self.output.as_str())?;
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::build_args;

    fn parse(argv: &[&str]) -> RenderArgs {
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Commands::Render(render) => render,
            Commands::Presets => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_args_to_command() {
        let args = parse(&[
            "ffcompose", "render", "-i", "in.mkv", "--seek-input", "10", "-o", "out.mp3",
            "--no-video", "--acodec", "libmp3lame", "--abitrate", "192", "--af", "volume=2",
        ]);

        let command = args.to_command(&Config::default()).unwrap();
        assert_eq!(
            build_args(&command),
            vec![
                "-ss", "10", "-i", "in.mkv", "-acodec", "libmp3lame", "-b:a", "192k",
                "-filter:a", "volume=2", "-vn", "out.mp3",
            ]
        );
    }

    #[test]
    fn test_render_args_with_preset_and_pipes() {
        let args = parse(&[
            "ffcompose", "render", "-i", "-", "--input-format", "mpegts", "-o", "-",
            "-p", "flashvideo", "--", "-shortest",
        ]);

        let command = args.to_command(&Config::default()).unwrap();
        assert!(command.inputs()[0].is_stream());
        assert!(command.current_output().flag("flvmeta"));

        let rendered = build_args(&command);
        assert_eq!(&rendered[..4], &["-f", "mpegts", "-i", "pipe:0"]);
        assert_eq!(rendered.last().map(String::as_str), Some("pipe:1"));
        assert!(rendered.contains(&"-shortest".to_string()));
    }

    #[test]
    fn test_render_args_unknown_preset_fails() {
        let args = parse(&["ffcompose", "render", "-i", "a.mp4", "-o", "b.mp4", "-p", "nope"]);
        assert!(args.to_command(&Config::default()).is_err());
    }
}
