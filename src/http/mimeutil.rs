//! File extension to MIME type lookup.
//!
//! Mirrors the primary and secondary mapping tables of Chromium's
//! `net/base/mime_util.cc`, restricted to what a page load can use.

const MAPPINGS: &[(&str, &[&str])] = &[
    // Primary mappings
    ("text/html", &["html", "htm", "shtml", "shtm"]),
    ("text/css", &["css"]),
    ("text/xml", &["xml"]),
    ("image/gif", &["gif"]),
    ("image/jpeg", &["jpeg", "jpg"]),
    ("image/webp", &["webp"]),
    ("image/png", &["png"]),
    ("video/mp4", &["mp4", "m4v"]),
    ("audio/mp4", &["m4a"]),
    ("audio/mpeg", &["mp3"]),
    ("video/ogg", &["ogv", "ogm"]),
    ("audio/ogg", &["ogg", "oga", "opus"]),
    ("video/webm", &["webm"]),
    ("audio/wav", &["wav"]),
    ("application/xhtml+xml", &["xhtml", "xht", "xhtm"]),
    ("application/x-chrome-extension", &["crx"]),
    ("multipart/related", &["mhtml", "mht"]),
    // Secondary mappings
    ("application/octet-stream", &["exe", "com", "bin"]),
    ("application/gzip", &["gz", "tgz"]),
    ("application/pdf", &["pdf"]),
    ("application/postscript", &["ps", "eps", "ai"]),
    ("application/javascript", &["js"]),
    ("application/json", &["json"]),
    ("application/wasm", &["wasm"]),
    ("font/woff", &["woff"]),
    ("font/woff2", &["woff2"]),
    ("image/bmp", &["bmp"]),
    ("image/x-icon", &["ico"]),
    ("image/svg+xml", &["svg", "svgz"]),
    ("image/tiff", &["tiff", "tif"]),
    ("text/plain", &["txt", "text"]),
    ("text/csv", &["csv"]),
    ("application/rss+xml", &["rss"]),
    ("application/zip", &["zip"]),
];

/// Look up the MIME type registered for a bare extension (no dot).
pub fn mime_type_from_extension(ext: &str) -> Option<&'static str> {
    MAPPINGS
        .iter()
        .find(|(_, exts)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .map(|(mime, _)| *mime)
}

/// Look up the MIME type for the extension of the last segment of `path`.
pub fn mime_type_from_path(path: &str) -> Option<&'static str> {
    let file_name = path.rsplit('/').next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() && ext.is_empty() {
        return None;
    }
    mime_type_from_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_from_extension("html"), Some("text/html"));
        assert_eq!(mime_type_from_extension("PNG"), Some("image/png"));
        assert_eq!(mime_type_from_extension("js"), Some("application/javascript"));
        assert_eq!(mime_type_from_extension("nope"), None);
    }

    #[test]
    fn test_path_uses_last_segment() {
        assert_eq!(mime_type_from_path("/android_asset/css/site.css"), Some("text/css"));
        assert_eq!(mime_type_from_path("/dir.with.dots/readme"), None);
        assert_eq!(mime_type_from_path("/archive.tar.gz"), Some("application/gzip"));
        assert_eq!(mime_type_from_path(""), None);
    }
}
