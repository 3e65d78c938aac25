//! Named presets: reusable bundles of builder calls.
//!
//! A preset is anything implementing [`Preset`]; it receives the command and calls back
//! into the fluent API. Names are looked up through a [`PresetResolver`], which keeps the
//! command independent of where presets come from (built in, TOML files, ...).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::command::FfmpegCommand;
use crate::error::BoxError;

pub trait Preset {
    fn load(&self, command: &mut FfmpegCommand) -> Result<(), BoxError>;
}

/// Looks up presets by name.
///
/// `Ok(None)` means this resolver does not know the name; an error means it does but
/// the preset could not be loaded.
pub trait PresetResolver {
    fn resolve(&self, name: &str) -> Result<Option<Box<dyn Preset>>, BoxError>;

    /// Names this resolver can currently resolve
    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Presets shipped with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinPreset {
    /// MPEG-4 video in AVI, tagged DIVX
    Divx,
    /// FLV video with MP3 audio, followed by an flvmeta pass
    FlashVideo,
    /// Small H.264 video with mono AAC audio, for podcast players
    Podcast,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 3] = [
        BuiltinPreset::Divx,
        BuiltinPreset::FlashVideo,
        BuiltinPreset::Podcast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinPreset::Divx => "divx",
            BuiltinPreset::FlashVideo => "flashvideo",
            BuiltinPreset::Podcast => "podcast",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

impl Preset for BuiltinPreset {
    fn load(&self, command: &mut FfmpegCommand) -> Result<(), BoxError> {
        match self {
            BuiltinPreset::Divx => {
                command
                    .format("avi")
                    .video_bitrate("1024k", false)
                    .video_codec("mpeg4")
                    .size("720x?")?
                    .audio_bitrate("128k")
                    .audio_channels(2)
                    .audio_codec("libmp3lame")
                    .output_options(["-vtag DIVX"]);
            }
            BuiltinPreset::FlashVideo => {
                command
                    .video_codec("flv")
                    .format("flv")
                    .audio_bitrate("96k")
                    .audio_codec("libmp3lame")
                    .audio_frequency(22050)
                    .audio_channels(2)
                    .flvmeta();
            }
            BuiltinPreset::Podcast => {
                command
                    .format("m4v")
                    .video_bitrate("512k", false)
                    .video_codec("libx264")
                    .size("320x176")?
                    .audio_bitrate("128k")
                    .audio_codec("aac")
                    .audio_channels(1)
                    .output_options([
                        "-profile:v baseline",
                        "-level 13",
                        "-qmin 10",
                        "-qmax 51",
                        "-bufsize 2M",
                    ]);
            }
        }
        Ok(())
    }
}

/// Resolver for [`BuiltinPreset`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPresets;

impl PresetResolver for BuiltinPresets {
    fn resolve(&self, name: &str) -> Result<Option<Box<dyn Preset>>, BoxError> {
        Ok(BuiltinPreset::from_name(name).map(|preset| Box::new(preset) as Box<dyn Preset>))
    }

    fn names(&self) -> Vec<String> {
        BuiltinPreset::ALL
            .iter()
            .map(|preset| preset.name().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioPreset {
    /// Disable audio (`-an`); other audio settings are ignored
    pub disabled: bool,
    pub codec: Option<String>,
    /// Bitrate in kbps, e.g. `"128k"`
    pub bitrate: Option<String>,
    pub channels: Option<u32>,
    pub frequency: Option<u32>,
    pub quality: Option<String>,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPreset {
    /// Disable video (`-vn`); other video settings are ignored
    pub disabled: bool,
    pub codec: Option<String>,
    /// Bitrate in kbps, e.g. `"1024k"`
    pub bitrate: Option<String>,
    pub constant_bitrate: bool,
    pub fps: Option<String>,
    pub frames: Option<u64>,
    /// `WxH`, `Wx?`, `?xH` or `N%`
    pub size: Option<String>,
    pub filters: Vec<String>,
}

/// Preset described in a TOML file.
///
/// ```toml
/// format = "mp4"
/// output_options = ["-movflags +faststart"]
///
/// [audio]
/// codec = "aac"
/// bitrate = "128k"
///
/// [video]
/// codec = "libx264"
/// size = "1280x?"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetFile {
    pub format: Option<String>,
    pub seek: Option<String>,
    pub duration: Option<String>,
    pub audio: AudioPreset,
    pub video: VideoPreset,
    pub map: Vec<String>,
    pub output_options: Vec<String>,
    pub flvmeta: bool,
}

impl PresetFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BoxError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Preset for PresetFile {
    fn load(&self, command: &mut FfmpegCommand) -> Result<(), BoxError> {
        if let Some(format) = &self.format {
            command.format(format.as_str());
        }
        if let Some(seek) = &self.seek {
            command.seek(seek);
        }
        if let Some(duration) = &self.duration {
            command.duration(duration);
        }

        let audio = &self.audio;
        if audio.disabled {
            command.no_audio();
        } else {
            if let Some(codec) = &audio.codec {
                command.audio_codec(codec.as_str());
            }
            if let Some(bitrate) = &audio.bitrate {
                command.audio_bitrate(bitrate);
            }
            if let Some(channels) = audio.channels {
                command.audio_channels(channels);
            }
            if let Some(frequency) = audio.frequency {
                command.audio_frequency(frequency);
            }
            if let Some(quality) = &audio.quality {
                command.audio_quality(quality);
            }
            command.audio_filters(&audio.filters);
        }

        let video = &self.video;
        if video.disabled {
            command.no_video();
        } else {
            if let Some(codec) = &video.codec {
                command.video_codec(codec.as_str());
            }
            if let Some(bitrate) = &video.bitrate {
                command.video_bitrate(bitrate, video.constant_bitrate);
            }
            if let Some(fps) = &video.fps {
                command.fps(fps);
            }
            if let Some(frames) = video.frames {
                command.frames(frames);
            }
            if let Some(size) = &video.size {
                command.size(size)?;
            }
            command.video_filters(&video.filters);
        }

        for spec in &self.map {
            command.map(spec);
        }
        command.output_options(self.output_options.iter().cloned());
        if self.flvmeta {
            command.flvmeta();
        }
        Ok(())
    }
}

/// Resolves `<directory>/<name>.toml` preset files
#[derive(Debug, Clone)]
pub struct PresetDirectory {
    root: PathBuf,
}

impl PresetDirectory {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PresetResolver for PresetDirectory {
    fn resolve(&self, name: &str) -> Result<Option<Box<dyn Preset>>, BoxError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(format!("invalid preset name: {name:?}").into());
        }

        let path = self.root.join(format!("{name}.toml"));
        if !path.is_file() {
            return Ok(None);
        }

        debug!("Loading preset file {}", path.display());
        let preset = PresetFile::from_file(&path)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        Ok(Some(Box::new(preset)))
    }

    fn names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().to_string()))
            .collect();
        names.sort();
        names
    }
}

/// Tries each resolver in order; the first one that knows the name wins
#[derive(Default, Clone)]
pub struct PresetChain {
    resolvers: Vec<Arc<dyn PresetResolver>>,
}

impl PresetChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: Arc<dyn PresetResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

impl PresetResolver for PresetChain {
    fn resolve(&self, name: &str) -> Result<Option<Box<dyn Preset>>, BoxError> {
        for resolver in &self.resolvers {
            if let Some(preset) = resolver.resolve(name)? {
                return Ok(Some(preset));
            }
        }
        Ok(None)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.resolvers.iter().flat_map(|resolver| resolver.names()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
