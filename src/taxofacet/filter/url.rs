//! Canonical search URLs.
//!
//! ```text
//! /search/{category}/{subcategory}/{subsubcategory}?city=&min=&max=&q=&sortBy=&attr.<name>=
//! ```
//!
//! Path segments are escaped before percent-encoding so that a taxonomy
//! name containing `/` still occupies exactly one segment:
//!
//! | literal | escaped |
//! |---------|---------|
//! | `~`     | `~~`    |
//! | `/`     | `~s`    |
//!
//! Decoding undoes the steps in reverse (percent-decode, then unescape).
//! Decoding is tolerant: anything it does not understand is dropped rather
//! than rejected. The only hard error is a path outside `/search`.

use crate::attributes::{format_number, parse_number};
use crate::error::{FacetError, Result};
use crate::model::{CategoryPath, FilterState, SortKey};
use url::form_urlencoded;

pub const SEARCH_PREFIX: &str = "/search";

const ESCAPE: char = '~';
const ATTR_PREFIX: &str = "attr.";

/// Escape and percent-encode one taxonomy name for use as a path segment.
pub fn escape_segment(name: &str) -> String {
    let escaped = name.replace(ESCAPE, "~~").replace('/', "~s");
    urlencoding::encode(&escaped).into_owned()
}

/// Inverse of [`escape_segment`]. Invalid percent sequences and unknown
/// escapes are kept literally.
pub fn unescape_segment(segment: &str) -> String {
    let decoded = match urlencoding::decode(segment) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes()))
            .into_owned(),
    };

    let mut out = String::with_capacity(decoded.len());
    let mut chars = decoded.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('~') => {
                chars.next();
                out.push('~');
            }
            Some('s') => {
                chars.next();
                out.push('/');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Render the canonical URL (path and query, no host) for a filter state.
///
/// `page` is not part of the URL; a shared link always opens on page 1.
pub fn encode_url(state: &FilterState) -> String {
    let mut url = String::from(SEARCH_PREFIX);
    for segment in state.path.segments() {
        url.push('/');
        url.push_str(&escape_segment(segment));
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(city) = &state.city {
        query.append_pair("city", city);
    }
    if let Some(min) = state.min_price {
        query.append_pair("min", &format_number(min));
    }
    if let Some(max) = state.max_price {
        query.append_pair("max", &format_number(max));
    }
    if let Some(text) = &state.free_text {
        query.append_pair("q", text);
    }
    if state.sort != SortKey::Newest {
        query.append_pair("sortBy", state.sort.as_str());
    }
    for (name, value) in &state.attributes {
        query.append_pair(&format!("{}{}", ATTR_PREFIX, name), value);
    }

    let query = query.finish();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Split a URL or path into its path and query parts, dropping any scheme,
/// host and fragment.
fn split_url(input: &str) -> (&str, &str) {
    let without_fragment = input.split_once('#').map_or(input, |(head, _)| head);
    let local = match without_fragment.split_once("://") {
        Some((_, rest)) => rest.find(['/', '?']).map_or("", |i| &rest[i..]),
        None => without_fragment,
    };
    local.split_once('?').unwrap_or((local, ""))
}

/// Parse a URL (absolute, or path plus query) back into a filter state.
pub fn decode_url(input: &str) -> Result<FilterState> {
    let (path, query) = split_url(input.trim());

    let rest = match path.strip_prefix(SEARCH_PREFIX) {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => {
            return Err(FacetError::Url(format!(
                "'{}' is not under {}",
                path, SEARCH_PREFIX
            )))
        }
    };

    let segments: Vec<String> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').map(unescape_segment).collect()
    };

    let mut state = FilterState::default().with_path(CategoryPath::from_segments(segments));

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.trim().is_empty() {
            continue;
        }
        match key.as_ref() {
            "city" => state.city = Some(value.into_owned()),
            "min" => state.min_price = parse_number(&value),
            "max" => state.max_price = parse_number(&value),
            "q" => state.free_text = Some(value.into_owned()),
            "sortBy" => state.sort = SortKey::parse_lenient(&value),
            other => {
                if let Some(name) = other.strip_prefix(ATTR_PREFIX).filter(|n| !n.is_empty()) {
                    state.attributes.insert(name.to_string(), value.into_owned());
                }
            }
        }
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> CategoryPath {
        CategoryPath::from_segments(segments.iter().copied())
    }

    #[test]
    fn test_encodes_path_and_facets() {
        let state = FilterState::default()
            .with_path(path(&["Motoryzacja", "Samochody osobowe"]))
            .with_city("Warszawa")
            .with_price(Some(5000.0), None);
        assert_eq!(
            encode_url(&state),
            "/search/Motoryzacja/Samochody%20osobowe?city=Warszawa&min=5000"
        );
    }

    #[test]
    fn test_empty_state_is_bare_prefix() {
        assert_eq!(encode_url(&FilterState::default()), "/search");
    }

    #[test]
    fn test_newest_sort_is_omitted() {
        let state = FilterState::default().with_sort(SortKey::Popular);
        assert_eq!(encode_url(&state), "/search?sortBy=popular");
    }

    #[test]
    fn test_slash_in_name_stays_in_one_segment() {
        let state = FilterState::default().with_path(path(&["Elektronika", "Konsole/Gry"]));
        let url = encode_url(&state);
        assert_eq!(url, "/search/Elektronika/Konsole~sGry");
        assert_eq!(decode_url(&url).unwrap().path, state.path);
    }

    #[test]
    fn test_escape_character_round_trips() {
        for name in ["~", "~s", "a~~b", "~/~", "100% ~s/", "Dom i Ogród"] {
            assert_eq!(unescape_segment(&escape_segment(name)), name, "{}", name);
        }
    }

    #[test]
    fn test_decodes_full_state() {
        let state = decode_url(
            "https://example.pl/search/Elektronika/Telefony%20i%20Akcesoria/Smartfony\
             ?city=Krak%C3%B3w&min=100&max=2500,50&q=iphone&sortBy=price_asc&attr.brand=Apple#top",
        )
        .unwrap();
        assert_eq!(
            state.path,
            path(&["Elektronika", "Telefony i Akcesoria", "Smartfony"])
        );
        assert_eq!(state.city.as_deref(), Some("Kraków"));
        assert_eq!(state.min_price, Some(100.0));
        assert_eq!(state.max_price, Some(2500.5));
        assert_eq!(state.free_text.as_deref(), Some("iphone"));
        assert_eq!(state.sort, SortKey::PriceAsc);
        assert_eq!(state.attributes.get("brand").map(String::as_str), Some("Apple"));
    }

    #[test]
    fn test_decoding_is_tolerant() {
        let state =
            decode_url("/search/Nieznana?min=abc&sortBy=cheapest&foo=bar&attr.=x&q=").unwrap();
        assert_eq!(state.path, path(&["Nieznana"]));
        assert_eq!(state.min_price, None);
        assert_eq!(state.sort, SortKey::Newest);
        assert!(state.attributes.is_empty());
        assert_eq!(state.free_text, None);
    }

    #[test]
    fn test_invalid_percent_encoding_decodes_lossily() {
        let state = decode_url("/search/Elektronika%FF").unwrap();
        assert_eq!(state.path.category(), Some("Elektronika\u{FFFD}"));
    }

    #[test]
    fn test_trailing_slash_is_root() {
        assert!(decode_url("/search/").unwrap().path.is_empty());
        assert!(decode_url("https://example.pl/search").unwrap().path.is_empty());
    }

    #[test]
    fn test_non_search_path_is_an_error() {
        assert!(matches!(decode_url("/listings/1"), Err(FacetError::Url(_))));
        assert!(matches!(decode_url("/searching"), Err(FacetError::Url(_))));
        assert!(decode_url("https://example.pl").is_err());
    }

    #[test]
    fn test_full_state_round_trips() {
        let state = FilterState::default()
            .with_path(path(&["Dom i Ogród", "Meble"]))
            .with_city("Zielona Góra")
            .with_price(Some(0.5), Some(1200.0))
            .with_free_text("stół & 4 krzesła")
            .with_sort(SortKey::Oldest)
            .with_attribute("kolor", "biały/szary");
        assert_eq!(decode_url(&encode_url(&state)).unwrap(), state);
    }
}
