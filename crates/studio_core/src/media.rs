use url::Url;

const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Image,
    Video,
}

/// The generated media currently shown in the result slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMedia {
    pub url: String,
    pub kind: ResultKind,
}

impl ResultMedia {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = if looks_like_video(&url) {
            ResultKind::Video
        } else {
            ResultKind::Image
        };
        Self { url, kind }
    }
}

/// Only images and videos can be sent for transformation.
pub fn is_supported_media_type(media_type: &str) -> bool {
    let media_type = media_type.trim().to_ascii_lowercase();
    media_type.starts_with("image/") || media_type.starts_with("video/")
}

fn looks_like_video(raw: &str) -> bool {
    // Query strings never decide the kind; only the path's extension does.
    let path = match Url::parse(raw) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or(raw)
            .to_ascii_lowercase(),
    };
    VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
