//! Pagination handling for the Lucidchart API.
//!
//! Listings are cursor-based. The cursor for the next page travels back to the
//! caller in the `Link` response header as `<url?...&pageToken=T>; rel="next"`
//! and is sent upstream again as the `pageToken` query parameter.

use crate::errors::{LucidchartResult, PaginationError};
use reqwest::header::{HeaderMap, LINK};
use url::Url;

/// Query parameter carrying the cursor.
pub const PAGE_TOKEN_PARAM: &str = "pageToken";

/// A page of results together with the cursor for the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Cursor for the next page. `None` means the listing is exhausted.
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Creates a new page.
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    /// A final page with no items.
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next_page_token.is_some()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps the items in this page, keeping the cursor.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_page_token: self.next_page_token,
        }
    }
}

/// Extracts the next-page cursor from a `Link` header value.
///
/// An empty header means there are no more pages. A header entry that is not
/// at least `<url>; rel=...`, or whose URL does not parse, is an error.
pub fn extract_page_token(link: &str) -> LucidchartResult<Option<String>> {
    let link = link.trim();
    if link.is_empty() {
        return Ok(None);
    }

    for entry in split_entries(link) {
        let (target, params) = split_target(entry)
            .ok_or_else(|| PaginationError::MalformedLinkHeader(link.to_string()))?;

        let rel = params
            .split(';')
            .map(str::trim)
            .find_map(|s| s.strip_prefix("rel="))
            .map(|r| r.trim_matches('"'));
        if rel.is_some_and(|r| r != "next") {
            continue;
        }

        let url = Url::parse(target).map_err(|source| PaginationError::InvalidLinkUrl {
            link: link.to_string(),
            source,
        })?;

        let token = url
            .query_pairs()
            .find(|(k, _)| k == PAGE_TOKEN_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());
        return Ok(token);
    }

    Ok(None)
}

/// Splits a header into entries on the commas outside `<...>`.
fn split_entries(link: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_target = false;
    let mut start = 0;

    for (i, c) in link.char_indices() {
        match c {
            '<' => in_target = true,
            '>' => in_target = false,
            ',' if !in_target => {
                entries.push(&link[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&link[start..]);

    entries
}

/// Splits one entry into its target URL and its `;`-separated parameters.
///
/// Returns `None` when the entry has no parameter segment.
fn split_target(entry: &str) -> Option<(&str, &str)> {
    let entry = entry.trim();
    let (target, rest) = match entry.strip_prefix('<').and_then(|e| e.split_once('>')) {
        Some((target, rest)) => (target, rest.trim_start()),
        None => {
            let at = entry.find(';')?;
            (entry[..at].trim(), &entry[at..])
        }
    };

    let params = rest.strip_prefix(';')?;
    Some((target.trim(), params))
}

/// Extracts the next-page cursor from response headers.
pub fn next_page_token(headers: &HeaderMap) -> LucidchartResult<Option<String>> {
    match headers.get(LINK) {
        Some(value) => {
            let value = value.to_str().map_err(|_| {
                PaginationError::MalformedLinkHeader("non-ASCII Link header".to_string())
            })?;
            extract_page_token(value)
        }
        None => Ok(None),
    }
}

/// Sets the cursor on a request URL. An absent or empty cursor leaves the query untouched.
pub fn apply_page_token(url: &mut Url, page_token: Option<&str>) {
    if let Some(token) = page_token.filter(|t| !t.is_empty()) {
        url.query_pairs_mut().append_pair(PAGE_TOKEN_PARAM, token);
    }
}
