//! Content types for served uploads.
//!
//! Only extensions on the allow-list are served; the type itself comes from
//! `mime_guess`. Markup and executables (`html`, `js`, `css`, `svg`, `exe`,
//! `swf`) are refused, as is anything `mime_guess` cannot name.

use std::path::Path;

use crate::error::{Error, Result};

const ALLOWED_EXTENSIONS: &[&str] = &[
    // Images
    "jpg", "jpeg", "jpe", "gif", "png", "bmp", "tif", "tiff", "webp", "avif", "ico", "heic",
    // Video
    "asf", "asx", "wmv", "wmx", "wm", "avi", "flv", "mov", "qt", "mpeg", "mpg", "mpe", "mp4",
    "m4v", "ogv", "webm", "mkv", "3gp", "3g2",
    // Audio
    "mp3", "m4a", "m4b", "aac", "ra", "ram", "wav", "ogg", "oga", "flac", "mid", "midi", "wma",
    "wax", "mka",
    // Text
    "txt", "asc", "srt", "csv", "tsv", "ics", "rtx", "vtt",
    // Documents and archives
    "rtf", "pdf", "tar", "zip", "gz", "rar", "7z", "psd", "doc", "docx", "docm", "pot", "pps",
    "ppt", "pptx", "xla", "xls", "xlt", "xlw", "xlsx", "mdb", "mpp", "odt", "ods", "odp", "odg",
    "key", "numbers", "pages",
];

pub fn is_allowed_extension(extension: &str) -> bool {
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

/// MIME type for a bare extension, if it is allowed and known.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    if !is_allowed_extension(extension) {
        return None;
    }
    mime_guess::from_ext(extension).first_raw()
}

/// MIME type for a file path, failing closed on unknown extensions.
pub fn mime_for_path(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| Error::UnsupportedMediaType(format!("{} has no extension", path.display())))?;

    mime_for_extension(extension)
        .ok_or_else(|| Error::UnsupportedMediaType(format!(".{extension}")))
}
