use std::fmt;

use super::filter::{make_filter_strings, FilterSpec};
use super::FfmpegCommand;

/// Express a bitrate in kbps with exactly one trailing `k`: `128` and `"128k"` both
/// become `"128k"`.
pub(crate) fn kbps<T: fmt::Display>(bitrate: T) -> String {
    let bitrate = bitrate.to_string();
    format!("{}k", bitrate.strip_suffix('k').unwrap_or(&bitrate))
}

impl FfmpegCommand {
    /// Disable audio in the current output (`-an`), dropping audio options and filters
    /// set so far
    pub fn no_audio(&mut self) -> &mut Self {
        let output = self.current_output_mut();
        output.audio.clear();
        output.audio_filters.clear();
        output.audio.push("-an");
        self
    }

    pub fn audio_codec<S: Into<String>>(&mut self, codec: S) -> &mut Self {
        self.current_output_mut()
            .audio
            .append(["-acodec".to_string(), codec.into()]);
        self
    }

    /// Audio bitrate in kbps, with or without a `k` suffix (`-b:a`)
    pub fn audio_bitrate<T: fmt::Display>(&mut self, bitrate: T) -> &mut Self {
        self.current_output_mut()
            .audio
            .append(["-b:a".to_string(), kbps(bitrate)]);
        self
    }

    pub fn audio_channels(&mut self, channels: u32) -> &mut Self {
        self.current_output_mut()
            .audio
            .append(["-ac".to_string(), channels.to_string()]);
        self
    }

    /// Audio sampling frequency in Hz (`-ar`)
    pub fn audio_frequency(&mut self, frequency: u32) -> &mut Self {
        self.current_output_mut()
            .audio
            .append(["-ar".to_string(), frequency.to_string()]);
        self
    }

    /// Codec-specific audio quality factor (`-aq`)
    pub fn audio_quality<T: fmt::Display>(&mut self, quality: T) -> &mut Self {
        self.current_output_mut()
            .audio
            .append(["-aq".to_string(), quality.to_string()]);
        self
    }

    /// Add audio filters to the current output.
    ///
    /// Accepts formatted filter strings, structured [`FilterDescriptor`]s, or a mix of both
    /// as [`FilterSpec`]s. Each filter is kept as its own token.
    ///
    /// [`FilterDescriptor`]: super::FilterDescriptor
    pub fn audio_filters<I, F>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FilterSpec>,
    {
        let filters = make_filter_strings(filters);
        self.current_output_mut().audio_filters.append(filters);
        self
    }
}
