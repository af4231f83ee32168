use std::borrow::Cow;
use urlencoding;

/// Percent-encode each `/`-separated segment of a node path, leaving the
/// separators alone so links stay readable.
pub fn url_encode_path(path: &str) -> String {
    path.split('/')
        .map(|p| urlencoding::encode(p))
        .collect::<Vec<Cow<'_, str>>>()
        .join("/")
}

pub fn url_decode_path(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(s) => s.to_string(),
        Err(_) => path.to_string(),
    }
}

/// The relative link that browses to `target`.  Not HTML-escaped; callers
/// placing it in an attribute must still run it through `escape_html`.
pub fn target_href(target: &str) -> String {
    format!("?{}", url_encode_path(target))
}
