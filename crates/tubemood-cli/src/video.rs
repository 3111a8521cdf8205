use std::sync::LazyLock;

use regex::Regex;

/// `watch?v=<id>`, `youtu.be/<id>`, `/shorts/<id>`, `/embed/<id>`, `/live/<id>`.
static URL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/embed/|/live/)([A-Za-z0-9_-]{11})")
        .expect("valid regex")
});

/// YouTube video ids are always 11 URL-safe base64 characters.
static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"));

/// Extracts a video id from a bare id or any common YouTube URL form.
///
/// # Errors
///
/// Returns an error for empty input or input that is neither a plain id nor
/// a URL carrying one.
pub(crate) fn parse_video_id(input: &str) -> anyhow::Result<String> {
    let input = input.trim();
    if input.is_empty() {
        anyhow::bail!("no video id given");
    }

    if let Some(caps) = URL_ID_RE.captures(input) {
        return Ok(caps[1].to_string());
    }

    if BARE_ID_RE.is_match(input) {
        return Ok(input.to_string());
    }

    anyhow::bail!("'{input}' is neither a video id nor a YouTube video URL")
}
