// SPDX-License-Identifier: MPL-2.0
//! File name classification.
//!
//! Maps a file name to a [`MediaKind`] by extension. Anything without a
//! known extension is unsupported and never enters the catalog.

use super::MediaKind;
use std::path::Path;

/// Supported media extensions, grouped by kind.
pub mod extensions {
    /// Video container extensions.
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "mkv"];

    /// GIF extensions.
    pub const GIF_EXTENSIONS: &[&str] = &["gif"];

    /// Still image extensions.
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "bmp", "svg"];

    /// All supported extensions (videos, GIFs, images).
    #[must_use]
    pub fn all_supported_extensions() -> Vec<&'static str> {
        VIDEO_EXTENSIONS
            .iter()
            .chain(GIF_EXTENSIONS.iter())
            .chain(IMAGE_EXTENSIONS.iter())
            .copied()
            .collect()
    }
}

/// Classifies a file name. Returns `None` for unsupported files.
///
/// The comparison is case-insensitive and only looks at the final extension,
/// so `clip.backup.MP4` is a video and `archive.mp4.zip` is unsupported.
#[must_use]
pub fn classify(name: &str) -> Option<MediaKind> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    if extensions::VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else if extensions::GIF_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Gif)
    } else if extensions::IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else {
        None
    }
}

/// Returns `true` if the file name has a supported media extension.
#[must_use]
pub fn is_supported(name: &str) -> bool {
    classify(name).is_some()
}

/// MIME type for a file name, used when content is materialized.
#[must_use]
pub fn mime_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_recognizes_video_extensions() {
        for name in ["a.mp4", "a.MP4", "a.webm", "a.ogg", "a.mov", "a.avi", "a.mkv"] {
            assert_eq!(classify(name), Some(MediaKind::Video), "{name}");
        }
    }

    #[test]
    fn classify_separates_gif_from_images() {
        assert_eq!(classify("loop.gif"), Some(MediaKind::Gif));
        assert_eq!(classify("loop.GIF"), Some(MediaKind::Gif));
        for name in ["a.jpg", "a.jpeg", "a.png", "a.webp", "a.avif", "a.bmp", "a.svg"] {
            assert_eq!(classify(name), Some(MediaKind::Image), "{name}");
        }
    }

    #[test]
    fn classify_rejects_unsupported_files() {
        assert_eq!(classify("notes.txt"), None);
        assert_eq!(classify("archive.mp4.zip"), None);
        assert_eq!(classify("no_extension"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify(".png"), None);
    }

    #[test]
    fn classify_uses_last_extension_only() {
        assert_eq!(classify("clip.backup.MP4"), Some(MediaKind::Video));
    }

    #[test]
    fn every_supported_extension_has_a_mime_type() {
        for ext in extensions::all_supported_extensions() {
            let name = format!("file.{ext}");
            assert!(is_supported(&name));
            assert_ne!(mime_type(&name), "application/octet-stream", "{ext}");
        }
    }
}
