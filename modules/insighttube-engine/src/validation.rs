use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Hosts (and their subdomains) that the analysis service understands.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

static RE_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").unwrap());

/// True when `raw` is an http(s) URL on a recognized video host.
pub fn is_supported_video_url(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    VIDEO_HOSTS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

/// Pull the 11-character video id out of a watch, share or shorts URL.
pub fn extract_video_id(raw: &str) -> Option<String> {
    RE_VIDEO_ID
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
