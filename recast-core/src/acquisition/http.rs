//! Direct file URLs.
//!
//! Only links that point at a media file are downloaded here. Pages on
//! streaming platforms are refused so that they go through the platform
//! extractor, which is disabled by default.

use std::io::{self, Write};

use url::Url;

use crate::acquisition::AcquiredMedia;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::formats::temp_suffix_for;
use crate::temp_files::create_temp_file;

/// Display name used when the URL path has no file name.
pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

/// Hosts (and their subdomains) treated as streaming platforms.
const STREAMING_PLATFORM_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "youtube-nocookie.com",
    "vimeo.com",
    "twitch.tv",
    "dailymotion.com",
    "tiktok.com",
    "facebook.com",
    "fb.watch",
    "instagram.com",
    "twitter.com",
    "x.com",
    "soundcloud.com",
];

/// Parses `raw` and checks it is an absolute http(s) URL with a host.
pub fn parse_media_url(raw: &str) -> CoreResult<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| CoreError::InvalidUrl(format!("{trimmed}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::InvalidUrl(format!(
            "{trimmed}: only http and https URLs are supported"
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::InvalidUrl(format!("{trimmed}: missing host")));
    }
    Ok(url)
}

/// True when the URL's host is a known streaming platform.
#[must_use]
pub fn is_streaming_platform(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    STREAMING_PLATFORM_HOSTS
        .iter()
        .any(|platform| host == *platform || host.ends_with(&format!(".{platform}")))
}

/// Last path segment of the URL, or [`DEFAULT_DOWNLOAD_NAME`].
#[must_use]
pub fn display_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string(), str::to_string)
}

/// Downloads a direct file URL into a temp file.
pub fn download_direct_url(config: &CoreConfig, raw: &str) -> CoreResult<AcquiredMedia> {
    let url = parse_media_url(raw)?;
    if is_streaming_platform(&url) {
        return Err(CoreError::StreamingPlatformUrl(url.to_string()));
    }

    let display_name = display_name_from_url(&url);
    crate::progress_reporting::processing(&format!("Downloading {url}"));

    let client = reqwest::blocking::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| CoreError::Download(format!("could not create HTTP client: {e}")))?;

    let mut response = client
        .get(url.clone())
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| CoreError::Download(e.to_string()))?;

    let mut temp = create_temp_file(config, "download", &temp_suffix_for(&display_name))?;
    let written = io::copy(&mut response, &mut temp).map_err(|e| {
        CoreError::Download(format!("reading response body from {url} failed: {e}"))
    })?;
    temp.flush()?;

    log::info!("Downloaded {} bytes from {}", written, url);
    AcquiredMedia::from_temp_file(temp.into_temp_path(), display_name)
}
