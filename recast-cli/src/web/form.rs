//! The browser UI's conversion form.
//!
//! Multipart fields are collected into a [`ConvertForm`] first and only then
//! interpreted, so the interpretation can be tested without building HTTP
//! bodies.

use std::collections::HashMap;

use axum::extract::Multipart;
use recast_core::options::{DEFAULT_CRF, DEFAULT_MP3_KBPS, DEFAULT_MP4_AUDIO_KBPS};
use recast_core::{
    ConversionTarget, CoreError, CoreResult, InputSource, Mp3Options, Mp4Options, Preset,
    Resolution,
};

use super::WebError;

/// Field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// An uploaded file as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Raw form contents.
#[derive(Debug, Default)]
pub struct ConvertForm {
    fields: HashMap<String, String>,
    upload: Option<Upload>,
}

impl ConvertForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a text field. Later values replace earlier ones.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn set_upload(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.upload = Some(Upload {
            file_name: file_name.into(),
            bytes,
        });
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn flag(&self, name: &str) -> bool {
        self.field(name)
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes"))
    }

    fn number<T: std::str::FromStr>(&self, name: &str, default: T) -> CoreResult<T> {
        match self.field(name) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| CoreError::InvalidOption(format!("{name}: '{raw}' is not a number"))),
        }
    }

    /// Where the media comes from. Consumes the upload.
    pub fn take_input_source(&mut self) -> CoreResult<InputSource> {
        match self.field("source").unwrap_or("upload") {
            "upload" => {
                let upload = self
                    .upload
                    .take()
                    .filter(|u| !u.file_name.is_empty() && !u.bytes.is_empty())
                    .ok_or_else(|| CoreError::InvalidOption("choose a file to upload".into()))?;
                Ok(InputSource::Upload {
                    file_name: upload.file_name,
                    bytes: upload.bytes,
                })
            }
            "url" => self
                .field("url")
                .map(|u| InputSource::DirectUrl(u.to_string()))
                .ok_or_else(|| CoreError::InvalidUrl("no URL given".into())),
            "platform" => self
                .field("url")
                .map(|u| InputSource::PlatformUrl(u.to_string()))
                .ok_or_else(|| CoreError::InvalidUrl("no URL given".into())),
            other => Err(CoreError::InvalidOption(format!("unknown source '{other}'"))),
        }
    }

    /// The requested output and its options, validated.
    pub fn target(&self) -> CoreResult<ConversionTarget> {
        let target = match self.field("target").unwrap_or("mp4") {
            "mp4" => ConversionTarget::Mp4(Mp4Options {
                resolution: self
                    .field("resolution")
                    .map_or(Ok(Resolution::Original), str::parse)?,
                crf: self.number("crf", DEFAULT_CRF)?,
                audio_bitrate_kbps: self.number("audio_bitrate", DEFAULT_MP4_AUDIO_KBPS)?,
                preset: self.field("preset").map_or(Ok(Preset::Medium), str::parse)?,
                normalize_audio: self.flag("normalize"),
            }),
            "mp3" => ConversionTarget::Mp3(Mp3Options {
                bitrate_kbps: self.number("bitrate", DEFAULT_MP3_KBPS)?,
                normalize_audio: self.flag("normalize"),
            }),
            other => {
                return Err(CoreError::InvalidOption(format!("unknown target '{other}'")));
            }
        };
        target.validate()?;
        Ok(target)
    }
}

/// Reads every multipart field into a [`ConvertForm`].
pub async fn read_form(mut multipart: Multipart) -> Result<ConvertForm, WebError> {
    let mut form = ConvertForm::new();
    while let Some(field) = multipart.next_field().await.map_err(WebError::from_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(WebError::from_multipart)?;
            if !file_name.is_empty() || !bytes.is_empty() {
                form.set_upload(file_name, bytes.to_vec());
            }
        } else {
            let value = field.text().await.map_err(WebError::from_multipart)?;
            form.set_field(name, value);
        }
    }
    Ok(form)
}
