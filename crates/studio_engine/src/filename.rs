use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::id::{generate_id, DOWNLOAD_SUFFIX_LEN, UPLOAD_ID_LEN};

const DEFAULT_UPLOAD_EXTENSION: &str = "jpg";
const DEFAULT_DOWNLOAD_EXTENSION: &str = "png";

static URL_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpe?g|png|webp|mp4|webm)").expect("valid extension regex"));

/// Random remote filename keeping the original extension: `{id}.{ext}`.
pub fn upload_file_name(original_name: &str) -> String {
    format!(
        "{}.{}",
        generate_id(UPLOAD_ID_LEN),
        upload_extension(original_name)
    )
}

fn upload_extension(original_name: &str) -> &str {
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => DEFAULT_UPLOAD_EXTENSION,
    }
}

/// Where the content host serves an uploaded file.
pub fn public_url(content_host: &str, file_name: &str) -> String {
    format!("{}/{}", content_host.trim_end_matches('/'), file_name)
}

/// Local name for a downloaded result: `{prefix}_{suffix}.{ext}`.
pub fn download_file_name(prefix: &str, extension: &str) -> String {
    format!(
        "{prefix}_{}.{extension}",
        generate_id(DOWNLOAD_SUFFIX_LEN)
    )
}

/// Best-guess extension for downloaded media. The declared content type wins;
/// otherwise the first known extension in the URL; otherwise `png`.
pub fn extension_for(url: &str, content_type: Option<&str>) -> String {
    if let Some(content_type) = content_type {
        let content_type = content_type.to_ascii_lowercase();
        for (needle, ext) in [
            ("jpeg", "jpg"),
            ("jpg", "jpg"),
            ("png", "png"),
            ("webp", "webp"),
            ("mp4", "mp4"),
        ] {
            if content_type.contains(needle) {
                return ext.to_string();
            }
        }
    }

    URL_EXTENSION
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|ext| ext.as_str().to_ascii_lowercase().replace("jpeg", "jpg"))
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_EXTENSION.to_string())
}

/// Media type guessed from a path's extension.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(media_type)
}
