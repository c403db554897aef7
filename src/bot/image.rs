use regex::Regex;
use std::sync::LazyLock;

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .unwrap()
});

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// True when the chat platform can render `url` as an image: a well formed
/// http(s) URL ending in an image extension, or any leafly.com image.
pub fn is_valid_image_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() || url.eq_ignore_ascii_case("nan") || !RE_URL.is_match(url) {
        return false;
    }

    let is_leafly = url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .is_some_and(|host| host == "leafly.com" || host.ends_with(".leafly.com"));
    if is_leafly {
        return true;
    }

    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
