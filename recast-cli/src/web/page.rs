//! HTML for the browser UI.

use recast_core::formats::accepted_extensions;
use recast_core::options::{
    AUDIO_BITRATES_KBPS, CRF_MAX, CRF_MIN, DEFAULT_CRF, DEFAULT_MP3_KBPS, DEFAULT_MP4_AUDIO_KBPS,
};
use recast_core::{Preset, Resolution};

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { font-size: 1.6rem; }
fieldset { border: 1px solid #ccc; border-radius: 6px; margin: 1rem 0; padding: 0.8rem 1rem; }
legend { font-weight: 600; }
label { display: block; margin: 0.4rem 0; }
details { background: #f6f6f6; padding: 0.6rem 1rem; border-radius: 6px; }
pre { background: #f6f6f6; padding: 0.8rem; overflow-x: auto; white-space: pre-wrap; }
button { padding: 0.5rem 1.2rem; font-size: 1rem; }
.error { color: #a00; }
";

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn options<T: PartialEq>(items: &[T], selected: &T, value: impl Fn(&T) -> String, label: impl Fn(&T) -> String) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                escape_html(&value(item)),
                if item == selected { " selected" } else { "" },
                escape_html(&label(item))
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn bitrate_options(selected: u32) -> String {
    options(&AUDIO_BITRATES_KBPS, &selected, u32::to_string, |k| format!("{k} kbps"))
}

fn source_fields(allow_platform_sources: bool) -> String {
    let accept = accepted_extensions()
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let platform = if allow_platform_sources {
        "<label><input type=\"radio\" name=\"source\" value=\"platform\"> Streaming-platform page (yt-dlp)</label>\n"
    } else {
        ""
    };
    format!(
        "<fieldset><legend>Source</legend>\n\
         <label><input type=\"radio\" name=\"source\" value=\"upload\" checked> Upload a file</label>\n\
         <label><input type=\"radio\" name=\"source\" value=\"url\"> Direct URL to a media file (not a streaming page)</label>\n\
         {platform}\
         <label>File <input type=\"file\" name=\"file\" accept=\"{accept}\"></label>\n\
         <label>URL <input type=\"url\" name=\"url\" size=\"50\" placeholder=\"https://example.com/video.mp4\"></label>\n\
         </fieldset>\n"
    )
}

/// The converter page.
///
/// One form: the source is chosen once and the target radio decides which
/// option group applies.
pub fn index_page(allow_platform_sources: bool, max_upload_bytes: usize) -> String {
    let sources = source_fields(allow_platform_sources);
    let resolutions = options(&Resolution::ALL, &Resolution::Original, |r| r.file_label().to_string(), Resolution::to_string);
    let presets = options(&Preset::ALL, &Preset::Medium, |p| p.as_str().to_string(), |p| p.as_str().to_string());
    let max_mib = max_upload_bytes / (1024 * 1024);

    let body = format!(
        "<h1>Media converter</h1>\n\
         <p>Convert a video to MP4 (H.264 + AAC) or extract its audio as MP3. Uploads up to {max_mib} MiB.</p>\n\
         <details><summary>Legal notice</summary>\n\
         <p>Only convert files you own or have permission to use. Downloading from streaming platforms \
         may breach their terms of service; you are responsible for the content you process.</p>\n\
         </details>\n\
         <form method=\"post\" action=\"/convert\" enctype=\"multipart/form-data\">\n\
         {sources}\
         <fieldset><legend>Output</legend>\n\
         <label><input type=\"radio\" name=\"target\" value=\"mp4\" checked> MP4 (video)</label>\n\
         <label><input type=\"radio\" name=\"target\" value=\"mp3\"> MP3 (audio only)</label>\n\
         <label><input type=\"checkbox\" name=\"normalize\"> Normalize loudness</label>\n\
         </fieldset>\n\
         <fieldset><legend>MP4 options</legend>\n\
         <label>Resolution <select name=\"resolution\">{resolutions}</select></label>\n\
         <label>Quality (CRF, lower is better) <input type=\"number\" name=\"crf\" min=\"{CRF_MIN}\" max=\"{CRF_MAX}\" value=\"{DEFAULT_CRF}\"></label>\n\
         <label>Audio bitrate <select name=\"audio_bitrate\">{mp4_bitrates}</select></label>\n\
         <label>Preset (speed vs quality) <select name=\"preset\">{presets}</select></label>\n\
         </fieldset>\n\
         <fieldset><legend>MP3 options</legend>\n\
         <label>Bitrate <select name=\"bitrate\">{mp3_bitrates}</select></label>\n\
         </fieldset>\n\
         <button type=\"submit\">Convert</button>\n\
         </form>\n",
        mp4_bitrates = bitrate_options(DEFAULT_MP4_AUDIO_KBPS),
        mp3_bitrates = bitrate_options(DEFAULT_MP3_KBPS),
    );
    layout("Media converter", &body)
}

/// Error page shown when a conversion fails.
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<h1 class=\"error\">{}</h1>\n<pre>{}</pre>\n<p><a href=\"/\">Back</a></p>\n",
        escape_html(title),
        escape_html(message)
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_index_page_lists_choices() {
        let page = index_page(false, 200 * 1024 * 1024);
        assert!(page.contains("action=\"/convert\""));
        assert!(page.contains("<option value=\"720p\">720p</option>"));
        assert!(page.contains("<option value=\"orig\" selected>Original</option>"));
        assert!(page.contains("<option value=\"medium\" selected>medium</option>"));
        assert!(page.contains("<option value=\"160\" selected>160 kbps</option>"));
        assert!(page.contains("<option value=\"192\" selected>192 kbps</option>"));
        assert!(page.contains("200 MiB"));
        assert!(page.contains(".mkv"));
        assert!(!page.contains("value=\"platform\""));
    }

    #[test]
    fn test_single_form_with_target_choice() {
        let page = index_page(true, 1024 * 1024);
        assert_eq!(page.matches("<form ").count(), 1);
        assert_eq!(page.matches("name=\"file\"").count(), 1);
        assert_eq!(page.matches("name=\"normalize\"").count(), 1);
        assert!(page.contains("name=\"target\" value=\"mp4\" checked"));
        assert!(page.contains("name=\"target\" value=\"mp3\""));
        assert!(page.contains("name=\"bitrate\""));
        assert!(page.contains("name=\"audio_bitrate\""));
    }

    #[test]
    fn test_platform_choice_only_when_enabled() {
        assert!(index_page(true, 1024 * 1024).contains("value=\"platform\""));
    }

    #[test]
    fn test_error_page_escapes() {
        let page = error_page("Encoding failed", "<script>");
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}
