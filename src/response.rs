//! Response metadata returned alongside (or instead of) decoded bodies.
//!
//! GitLab reports pagination and rate-limit state through response headers.
//! [`ResponseMeta`] captures them so callers can branch on status codes and
//! follow pagination cursors without holding on to the raw response.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;

const HEADER_REQUEST_ID: &str = "x-request-id";
const HEADER_PAGE: &str = "x-page";
const HEADER_PER_PAGE: &str = "x-per-page";
const HEADER_TOTAL: &str = "x-total";
const HEADER_TOTAL_PAGES: &str = "x-total-pages";
const HEADER_NEXT_PAGE: &str = "x-next-page";
const HEADER_PREV_PAGE: &str = "x-prev-page";
const HEADER_RATE_LIMIT: &str = "ratelimit-limit";
const HEADER_RATE_REMAINING: &str = "ratelimit-remaining";
const HEADER_RATE_RESET: &str = "ratelimit-reset";
const HEADER_RETRY_AFTER: &str = "retry-after";
const HEADER_LINK: &str = "link";

/// Transport-level metadata of a single HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Server-assigned request ID (`X-Request-Id`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Rate limit state reported by the server.
    pub rate_limit: RateLimit,
    /// Pagination cursors reported by the server.
    pub pagination: PageInfo,
}

/// Rate limit headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    /// Requests allowed in the current window.
    pub limit: Option<u64>,
    /// Requests left in the current window.
    pub remaining: Option<u64>,
    /// Unix timestamp at which the window resets.
    pub reset: Option<u64>,
    /// Seconds to wait before retrying (only on throttled responses).
    pub retry_after: Option<u64>,
}

/// Offset and keyset pagination headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_link: Option<String>,
}

impl ResponseMeta {
    /// Build metadata from a response's status and headers.
    pub fn from_parts(status: StatusCode, headers: &HeaderMap) -> Self {
        let mut pagination = PageInfo {
            page: header_number(headers, HEADER_PAGE),
            per_page: header_number(headers, HEADER_PER_PAGE),
            total: header_number(headers, HEADER_TOTAL),
            total_pages: header_number(headers, HEADER_TOTAL_PAGES),
            next_page: header_number(headers, HEADER_NEXT_PAGE),
            prev_page: header_number(headers, HEADER_PREV_PAGE),
            ..Default::default()
        };

        if let Some(link) = header_str(headers, HEADER_LINK) {
            for (rel, target) in parse_link_header(link) {
                match rel {
                    "first" => pagination.first_link = Some(target.to_string()),
                    "prev" => pagination.prev_link = Some(target.to_string()),
                    "next" => pagination.next_link = Some(target.to_string()),
                    "last" => pagination.last_link = Some(target.to_string()),
                    _ => {}
                }
            }
        }

        Self {
            status: status.as_u16(),
            request_id: header_str(headers, HEADER_REQUEST_ID).map(str::to_string),
            rate_limit: RateLimit {
                limit: header_number(headers, HEADER_RATE_LIMIT),
                remaining: header_number(headers, HEADER_RATE_REMAINING),
                reset: header_number(headers, HEADER_RATE_RESET),
                retry_after: header_number(headers, HEADER_RETRY_AFTER),
            },
            pagination,
        }
    }

    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Next page number, if the server reported one.
    pub fn next_page(&self) -> Option<u32> {
        self.pagination.next_page
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn header_number<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
    header_str(headers, name).and_then(|v| v.parse().ok())
}

/// Split an RFC 8288 `Link` header into `(rel, url)` pairs.
fn parse_link_header(value: &str) -> Vec<(&str, &str)> {
    value
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let target = pieces
                .next()?
                .trim()
                .strip_prefix('<')?
                .strip_suffix('>')?;
            let rel = pieces.find_map(|param| {
                let (key, val) = param.trim().split_once('=')?;
                (key.trim() == "rel").then(|| val.trim().trim_matches('"'))
            })?;
            Some((rel, target))
        })
        .collect()
}
