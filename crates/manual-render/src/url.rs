use std::sync::LazyLock;

use regex::Regex;

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").unwrap());

/// Returns the URL to emit for a link (`image == false`) or image source.
/// Script-capable schemes collapse to `#`.
pub(crate) fn sanitize_url(url: &str, image: bool) -> &str {
    // Browsers ignore embedded whitespace and control characters when
    // resolving a scheme, so `java\tscript:` must be caught too.
    let compact: String = url
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && !ch.is_ascii_control())
        .collect();

    let Some(captures) = SCHEME_RE.captures(&compact) else {
        return url;
    };
    let scheme = captures[1].to_ascii_lowercase();

    let blocked = match scheme.as_str() {
        "javascript" | "vbscript" => true,
        "data" => !(image && compact[5..].to_ascii_lowercase().starts_with("image/")),
        _ => false,
    };

    if blocked {
        "#"
    } else {
        url
    }
}
