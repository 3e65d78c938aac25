use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::audio::kbps;
use super::filter::{make_filter_strings, FilterSpec};
use super::FfmpegCommand;
use crate::error::{FfcomposeError, Result};

static RE_PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)%$").unwrap());
static RE_FIXED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)x([0-9]+)$").unwrap());
static RE_FIXED_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)x\?$").unwrap());
static RE_FIXED_HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\?x([0-9]+)$").unwrap());

/// Translate a size specification into a `scale` filter.
///
/// Computed dimensions are rounded down to even values, as most encoders require.
fn scale_filter(size: &str) -> Option<String> {
    if let Some(caps) = RE_PERCENT.captures(size) {
        let ratio = &caps[1];
        return Some(format!(
            "scale=trunc(iw*{ratio}/100/2)*2:trunc(ih*{ratio}/100/2)*2"
        ));
    }
    if let Some(caps) = RE_FIXED.captures(size) {
        return Some(format!("scale={}:{}", &caps[1], &caps[2]));
    }
    if let Some(caps) = RE_FIXED_WIDTH.captures(size) {
        return Some(format!("scale={}:trunc(ow/a/2)*2", &caps[1]));
    }
    if let Some(caps) = RE_FIXED_HEIGHT.captures(size) {
        return Some(format!("scale=trunc(oh*a/2)*2:{}", &caps[1]));
    }
    None
}

impl FfmpegCommand {
    /// Disable video in the current output (`-vn`), dropping video options and filters
    /// set so far
    pub fn no_video(&mut self) -> &mut Self {
        let output = self.current_output_mut();
        output.video.clear();
        output.video_filters.clear();
        output.video.push("-vn");
        self
    }

    pub fn video_codec<S: Into<String>>(&mut self, codec: S) -> &mut Self {
        self.current_output_mut()
            .video
            .append(["-vcodec".to_string(), codec.into()]);
        self
    }

    /// Video bitrate in kbps, with or without a `k` suffix (`-b:v`).
    ///
    /// A constant bitrate also pins `-maxrate`/`-minrate` to the same value.
    pub fn video_bitrate<T: fmt::Display>(&mut self, bitrate: T, constant: bool) -> &mut Self {
        let bitrate = kbps(bitrate);
        let video = &mut self.current_output_mut().video;
        video.append(["-b:v".to_string(), bitrate.clone()]);
        if constant {
            video.append([
                "-maxrate".to_string(),
                bitrate.clone(),
                "-minrate".to_string(),
                bitrate,
                "-bufsize".to_string(),
                "3M".to_string(),
            ]);
        }
        self
    }

    /// Output frame rate (`-r`)
    pub fn fps<T: fmt::Display>(&mut self, fps: T) -> &mut Self {
        self.current_output_mut()
            .video
            .append(["-r".to_string(), fps.to_string()]);
        self
    }

    /// Stop after encoding this many frames (`-vframes`)
    pub fn frames(&mut self, frames: u64) -> &mut Self {
        self.current_output_mut()
            .video
            .append(["-vframes".to_string(), frames.to_string()]);
        self
    }

    /// Add video filters to the current output; see [`FfmpegCommand::audio_filters`]
    pub fn video_filters<I, F>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FilterSpec>,
    {
        let filters = make_filter_strings(filters);
        self.current_output_mut().video_filters.append(filters);
        self
    }

    /// Set the frame size of the current output.
    ///
    /// Accepts `WxH`, `Wx?` and `?xH` (keeping the aspect ratio) or `N%`. A later call
    /// replaces the size set by an earlier one.
    pub fn size(&mut self, size: &str) -> Result<&mut Self> {
        let filter =
            scale_filter(size).ok_or_else(|| FfcomposeError::InvalidSize(size.to_string()))?;

        let size_filters = &mut self.current_output_mut().size_filters;
        size_filters.clear();
        size_filters.push(filter);
        Ok(self)
    }
}
