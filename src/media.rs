pub const DEFAULT_BASE_URL: &str = "https://media.graphcms.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// List view card thumbnail
pub const THUMBNAIL: ImageSize = ImageSize {
    width: 100,
    height: 100,
};

/// Detail view hero image
pub const HERO: ImageSize = ImageSize {
    width: 650,
    height: 366,
};

/// Build a cropped display URL for an image handle on the resize service.
pub fn resize_url(base_url: &str, handle: &str, size: ImageSize) -> String {
    format!(
        "{}/resize=w:{},h:{},fit:crop/{}",
        base_url.trim_end_matches('/'),
        size.width,
        size.height,
        handle
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_url() {
        assert_eq!(
            resize_url(DEFAULT_BASE_URL, "abc123", THUMBNAIL),
            "https://media.graphcms.com/resize=w:100,h:100,fit:crop/abc123"
        );
    }

    #[test]
    fn hero_url() {
        assert_eq!(
            resize_url(DEFAULT_BASE_URL, "abc123", HERO),
            "https://media.graphcms.com/resize=w:650,h:366,fit:crop/abc123"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        assert_eq!(
            resize_url("https://cdn.example.com/", "h", THUMBNAIL),
            "https://cdn.example.com/resize=w:100,h:100,fit:crop/h"
        );
    }

    #[test]
    fn same_input_same_url() {
        let a = resize_url(DEFAULT_BASE_URL, "xyz", HERO);
        let b = resize_url(DEFAULT_BASE_URL, "xyz", HERO);
        assert_eq!(a, b);
    }
}
