#![forbid(unsafe_code)]

//! Embed URL construction.
//!
//! The embed URL is the configured base URL with the `embed=true` marker
//! always set, followed by every caller parameter in mapping order. Setting
//! a parameter overwrites the first existing occurrence in place and drops
//! later duplicates; otherwise it appends. Building is pure and idempotent
//! on its own output.

use indexmap::IndexMap;
use url::Url;

use crate::error::EmbedError;

/// Query parameter marking the page as embedded.
pub const EMBED_MARKER_KEY: &str = "embed";
pub const EMBED_MARKER_VALUE: &str = "true";

/// Build the fully qualified embed URL for `base`.
///
/// Fails with [`EmbedError::InvalidUrl`] when `base` is not a valid
/// absolute URL.
pub fn build_embed_url(
    base: &str,
    params: &IndexMap<String, String>,
) -> Result<String, EmbedError> {
    let mut url = Url::parse(base).map_err(|source| EmbedError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    set_query_pair(&mut pairs, EMBED_MARKER_KEY, EMBED_MARKER_VALUE);
    for (key, value) in params {
        set_query_pair(&mut pairs, key, value);
    }

    {
        let mut editor = url.query_pairs_mut();
        editor.clear();
        for (key, value) in &pairs {
            editor.append_pair(key, value);
        }
    }

    Ok(url.into())
}

/// Overwrite the first `key` occurrence in place and drop later duplicates;
/// append when absent.
fn set_query_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter().position(|(existing, _)| existing == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = first + 1;
            while index < pairs.len() {
                if pairs[index].0 == key {
                    pairs.remove(index);
                } else {
                    index += 1;
                }
            }
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }
}
