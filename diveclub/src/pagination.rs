//! Page arithmetic for the HTML lists and the `Content-Range` header used by
//! the admin API.

use axum::http::header::HeaderMap;

use crate::errors::ApiError;

/// Page size used by the list views unless configured otherwise.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Upper bound for admin API page sizes.
pub const MAX_PER_PAGE: u64 = 1000;

/// One page of an ordered result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: u64,
    pub per_page: u64,
    /// Total number of matching records across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn num_pages(&self) -> u64 {
        num_pages(self.total, self.per_page)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }
}

/// Number of pages needed for `total` records. An empty result still has one
/// (empty) page.
#[must_use]
pub fn num_pages(total: u64, per_page: u64) -> u64 {
    if total == 0 || per_page == 0 {
        1
    } else {
        total.div_ceil(per_page)
    }
}

/// Resolve the raw `page` query value against the result size.
///
/// Missing or blank values mean page 1 and `last` means the final page.
///
/// # Errors
///
/// Returns a not-found error for non-numeric values, zero, and pages past the
/// end of the result set.
pub fn resolve_page(raw: Option<&str>, total: u64, per_page: u64) -> Result<u64, ApiError> {
    let last = num_pages(total, per_page);
    let number = match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => 1,
        Some("last") => last,
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ApiError::not_found("Page", Some(value.to_string())))?,
    };

    if number == 0 || number > last {
        return Err(ApiError::not_found("Page", Some(number.to_string())));
    }
    Ok(number)
}

/// Parse a React-Admin range string into an inclusive `(start, end)` pair.
#[must_use]
pub fn parse_range(range: Option<&str>, default_per_page: u64) -> (u64, u64) {
    let fallback = (0, default_per_page.saturating_sub(1));
    range.map_or(fallback, |r| {
        serde_json::from_str::<[u64; 2]>(r)
            .ok()
            .filter(|[start, end]| end >= start)
            .map_or(fallback, |[start, end]| (start, end))
    })
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Build the `Content-Range` header React-Admin reads the total from.
///
/// Format: `members 0-9/42`.
#[must_use]
pub fn calculate_content_range(offset: u64, limit: u64, total_count: u64, resource_name: &str) -> HeaderMap {
    let max_offset_limit = offset
        .saturating_add(limit)
        .saturating_sub(1)
        .min(total_count.saturating_sub(1).max(offset));
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = format!("{safe_name} {offset}-{max_offset_limit}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
