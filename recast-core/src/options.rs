//! User-chosen encoding options.
//!
//! These are the knobs exposed by both front ends. Values coming from a UI
//! arrive as strings or plain integers, so every type here parses from text
//! and every options struct can be validated before any work starts.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Lowest CRF offered (best quality).
pub const CRF_MIN: u8 = 18;
/// Highest CRF offered (smallest files).
pub const CRF_MAX: u8 = 30;
/// Default CRF for MP4 output.
pub const DEFAULT_CRF: u8 = 23;

/// Audio bitrates offered, in kbps.
pub const AUDIO_BITRATES_KBPS: [u32; 7] = [96, 128, 160, 192, 224, 256, 320];
/// Default AAC bitrate for MP4 output.
pub const DEFAULT_MP4_AUDIO_KBPS: u32 = 160;
/// Default MP3 bitrate.
pub const DEFAULT_MP3_KBPS: u32 = 192;

/// Output height for MP4 conversions. Width follows the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Original,
    P360,
    P480,
    P720,
    P1080,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::Original,
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
    ];

    /// Target height in pixels, `None` keeps the source size.
    #[must_use]
    pub fn height(self) -> Option<u32> {
        match self {
            Self::Original => None,
            Self::P360 => Some(360),
            Self::P480 => Some(480),
            Self::P720 => Some(720),
            Self::P1080 => Some(1080),
        }
    }

    /// Short label used in generated file names.
    #[must_use]
    pub fn file_label(self) -> &'static str {
        match self {
            Self::Original => "orig",
            Self::P360 => "360p",
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("Original"),
            other => f.write_str(other.file_label()),
        }
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" | "orig" => Ok(Self::Original),
            "360p" | "360" => Ok(Self::P360),
            "480p" | "480" => Ok(Self::P480),
            "720p" | "720" => Ok(Self::P720),
            "1080p" | "1080" => Ok(Self::P1080),
            other => Err(CoreError::InvalidOption(format!(
                "unknown resolution '{other}' (expected Original, 360p, 480p, 720p or 1080p)"
            ))),
        }
    }
}

/// x264 speed/compression trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    #[default]
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::Ultrafast,
        Preset::Superfast,
        Preset::Veryfast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::Veryslow,
    ];

    /// Name passed to `-preset`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| CoreError::InvalidOption(format!("unknown preset '{}'", s.trim())))
    }
}

fn validate_bitrate(kbps: u32) -> CoreResult<()> {
    if AUDIO_BITRATES_KBPS.contains(&kbps) {
        Ok(())
    } else {
        Err(CoreError::InvalidOption(format!(
            "audio bitrate {kbps}k is not one of {AUDIO_BITRATES_KBPS:?}"
        )))
    }
}

/// Options for H.264 + AAC MP4 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp4Options {
    pub resolution: Resolution,
    pub crf: u8,
    pub audio_bitrate_kbps: u32,
    pub preset: Preset,
    pub normalize_audio: bool,
}

impl Default for Mp4Options {
    fn default() -> Self {
        Self {
            resolution: Resolution::Original,
            crf: DEFAULT_CRF,
            audio_bitrate_kbps: DEFAULT_MP4_AUDIO_KBPS,
            preset: Preset::Medium,
            normalize_audio: false,
        }
    }
}

impl Mp4Options {
    pub fn validate(&self) -> CoreResult<()> {
        if !(CRF_MIN..=CRF_MAX).contains(&self.crf) {
            return Err(CoreError::InvalidOption(format!(
                "CRF {} is outside {CRF_MIN}..={CRF_MAX}",
                self.crf
            )));
        }
        validate_bitrate(self.audio_bitrate_kbps)
    }
}

/// Options for MP3 audio extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp3Options {
    pub bitrate_kbps: u32,
    pub normalize_audio: bool,
}

impl Default for Mp3Options {
    fn default() -> Self {
        Self {
            bitrate_kbps: DEFAULT_MP3_KBPS,
            normalize_audio: false,
        }
    }
}

impl Mp3Options {
    pub fn validate(&self) -> CoreResult<()> {
        validate_bitrate(self.bitrate_kbps)
    }
}

/// What a conversion should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTarget {
    Mp4(Mp4Options),
    Mp3(Mp3Options),
}

impl ConversionTarget {
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Self::Mp4(opts) => opts.validate(),
            Self::Mp3(opts) => opts.validate(),
        }
    }

    /// Output container extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4(_) => "mp4",
            Self::Mp3(_) => "mp3",
        }
    }

    /// MIME type of the produced file.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp4(_) => "video/mp4",
            Self::Mp3(_) => "audio/mpeg",
        }
    }
}
