//! Conditional file responder.
//!
//! Serves a single upload with `ETag` / `Last-Modified` validation. The ETag
//! is derived from the formatted modification time, not the file bytes, so
//! it only changes when the mtime does.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

use crate::config::DEFAULT_CACHE_MAX_AGE;
use crate::error::{Error, Result};
use crate::mime::mime_for_path;
use crate::models::ConditionalRequest;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Outcome of serving a file.
#[derive(Debug)]
pub enum FileResponse {
    /// The client's cached copy is current; send 304 with no body.
    NotModified,
    /// Send 200 with headers and the full file.
    Full(ServedFile),
}

impl FileResponse {
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotModified => 304,
            Self::Full(_) => 200,
        }
    }
}

/// A file ready to stream, with the headers that describe it.
#[derive(Debug)]
pub struct ServedFile {
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub etag: String,
    /// HTTP date without the trailing zone name.
    pub last_modified: String,
    pub content_length: u64,
    pub filename: String,
    pub cache_control: String,
    file: File,
}

impl ServedFile {
    /// Response headers in the order they are written.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Cache-Control", self.cache_control.clone()),
            ("Content-Type", self.mime_type.to_string()),
            ("ETag", self.etag.clone()),
            ("Last-Modified", format!("{} GMT", self.last_modified)),
            ("Content-Length", self.content_length.to_string()),
            ("Content-Disposition", format!("filename={}", self.filename)),
        ]
    }

    /// The open handle the headers were computed from.
    pub fn into_file(self) -> File {
        self.file
    }
}

/// Serves files with conditional-GET semantics.
#[derive(Debug, Clone)]
pub struct FileResponder {
    max_age: Duration,
}

impl Default for FileResponder {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_MAX_AGE)
    }
}

impl FileResponder {
    pub const fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Evaluate validators against `path` and prepare the response.
    pub fn serve(&self, path: &Path, validators: &ConditionalRequest) -> Result<FileResponse> {
        let file = File::open(path).map_err(|error| match error.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                Error::NotFound(path.display().to_string())
            }
            _ => Error::Io(error),
        })?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(Error::NotFound(path.display().to_string()));
        }

        let mime_type = mime_for_path(path)?;
        let modified = metadata.modified()?;
        let last_modified = format_last_modified(modified);
        let etag = etag_for(&last_modified);

        if let Some(client_etag) = validators.if_none_match.as_deref() {
            let client_etag = strip_slashes(client_etag);
            if !client_etag.is_empty() && client_etag == etag {
                tracing::debug!(path = %path.display(), "ETag matched, not modified");
                return Ok(FileResponse::NotModified);
            }
        }

        if let Some(since) = validators.if_modified_since.as_deref() {
            if let Some(since) = parse_client_date(since) {
                if unix_seconds(modified) <= since {
                    tracing::debug!(path = %path.display(), "Unmodified since client date");
                    return Ok(FileResponse::NotModified);
                }
            }
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(FileResponse::Full(ServedFile {
            path: path.to_path_buf(),
            mime_type,
            etag,
            last_modified,
            content_length: metadata.len(),
            filename,
            cache_control: format!("max-age={}", self.max_age.as_secs()),
            file,
        }))
    }
}

/// Format a modification time as an HTTP date, without the zone suffix.
pub fn format_last_modified(modified: SystemTime) -> String {
    DateTime::<Utc>::from(modified)
        .format(HTTP_DATE_FORMAT)
        .to_string()
}

/// Quoted MD5 hex digest of the formatted last-modified string.
pub fn etag_for(last_modified: &str) -> String {
    format!("\"{}\"", hex::encode(Md5::digest(last_modified.as_bytes())))
}

fn unix_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}

/// Parse a client-supplied date; unparseable values never validate.
fn parse_client_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(time) = httpdate::parse_http_date(raw) {
        return Some(unix_seconds(time));
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|date| date.timestamp())
}

/// Remove backslash escaping the way some proxies and clients add it.
fn strip_slashes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
