//! Query-string helpers over [`url::Url`].

use healthcheck_types::UrlParams;
use url::Url;

/// Extracts the recognized, non-empty parameters from a URL.
#[must_use]
pub fn params_from_url(url: &Url) -> UrlParams {
    UrlParams::from_pairs(url.query_pairs())
}

/// Sets `key` to `value`, replacing every existing occurrence in place and
/// appending it if absent. Other query pairs keep their order.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (k, v) in url.query_pairs() {
        if k == key {
            if !replaced {
                pairs.push((k.into_owned(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }
    if !replaced {
        pairs.push((key.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}
