// ABOUTME: YouTube link recognition for exercise video URLs
// ABOUTME: Derives a medium-quality thumbnail URL from shorts, watch, embed and short links
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::constants::video::{THUMBNAIL_PREFIX, THUMBNAIL_SUFFIX, YOUTUBE_ID_LEN};
use regex::Regex;
use std::sync::LazyLock;

/// `youtube.com/shorts/<id>` where the id ends the path segment
static SHORTS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/shorts/([^/?#&]+)").ok()
});

/// Watch, embed, `v/`, `u/x/` and `youtu.be` forms; the id is validated by length afterwards
static VIDEO_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").ok()
});

/// Extract the 11-character video identifier from a YouTube link
#[must_use]
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if let Some(pattern) = SHORTS_PATTERN.as_ref() {
        if let Some(id) = pattern.captures(url).and_then(|captures| captures.get(1)) {
            return is_video_id(id.as_str()).then(|| id.as_str());
        }
    }

    VIDEO_PATTERN
        .as_ref()?
        .captures(url)
        .and_then(|captures| captures.get(2))
        .map(|id| id.as_str())
        .filter(|id| is_video_id(id))
}

/// Thumbnail image URL for a YouTube link, or `None` when the link is not recognised
///
/// ```
/// use bodyplan::utils::youtube_thumbnail;
///
/// assert_eq!(
///     youtube_thumbnail("https://youtube.com/shorts/abcdefghijk").as_deref(),
///     Some("https://img.youtube.com/vi/abcdefghijk/mqdefault.jpg")
/// );
/// assert_eq!(youtube_thumbnail("not a url"), None);
/// ```
#[must_use]
pub fn youtube_thumbnail(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| format!("{THUMBNAIL_PREFIX}{id}{THUMBNAIL_SUFFIX}"))
}

fn is_video_id(candidate: &str) -> bool {
    candidate.chars().count() == YOUTUBE_ID_LEN
}
