//! YouTube URL helpers used by the video selector preview column.
//!
//! Nothing in here returns an error: a URL that cannot be understood simply
//! yields `None` and the caller renders a placeholder instead.

use once_cell::sync::Lazy;
use regex::Regex;

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
const EMBED_BASE: &str = "https://www.youtube.com/embed";

// watch?v=<id> (v may follow other query params), youtu.be/<id>, embed/<id>, v/<id>
static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .expect("video id regex should compile")
});

/// Extract the 11 character video identifier from any of the common URL shapes.
pub fn extract_video_id(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    VIDEO_ID_REGEX
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Thumbnail image for the video, `None` when the id cannot be extracted.
pub fn preview_url(url: &str) -> Option<String> {
    extract_video_id(url).map(|id| format!("{THUMBNAIL_BASE}/{id}/hqdefault.jpg"))
}

/// Embedded player URL with autoplay enabled.
pub fn embed_url(url: &str) -> Option<String> {
    extract_video_id(url).map(|id| format!("{EMBED_BASE}/{id}?autoplay=1"))
}

pub fn is_valid(url: Option<&str>) -> bool {
    url.is_some_and(|u| !u.is_empty() && extract_video_id(u).is_some())
}
