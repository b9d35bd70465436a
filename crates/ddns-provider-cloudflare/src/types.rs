//! Cloudflare API v4 wire types

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Cloudflare API response
///
/// `success: false` is a failure even when the HTTP status is 2xx.
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CloudflareApiError>,
    pub result: Option<T>,
    pub result_info: Option<CloudflareResultInfo>,
}

impl<T> CloudflareResponse<T> {
    /// Joined error messages reported in the envelope
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "Unknown error".to_string();
        }

        self.errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One entry of the envelope's `errors` array
#[derive(Debug, Deserialize)]
pub struct CloudflareApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Pagination metadata returned by list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CloudflareResultInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub count: Option<u32>,
    pub total_count: Option<u32>,
    pub total_pages: Option<u32>,
}

impl CloudflareResultInfo {
    /// Whether pages after `page` remain, given `page_size` requested records
    ///
    /// `total_pages` is authoritative; `total_count` is the fallback. With
    /// neither present the listing is treated as complete.
    pub fn has_more(&self, page: u32, page_size: u32) -> bool {
        if let Some(total_pages) = self.total_pages {
            return page < total_pages;
        }

        if let Some(total_count) = self.total_count {
            let per_page = self.per_page.unwrap_or(page_size).max(1);
            return u64::from(page) * u64::from(per_page) < u64::from(total_count);
        }

        false
    }
}

/// Body for record create (POST) and update (PATCH)
#[derive(Debug, Serialize)]
pub struct RecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_decides_continuation() {
        let info = CloudflareResultInfo {
            total_pages: Some(3),
            ..Default::default()
        };
        assert!(info.has_more(1, 100));
        assert!(info.has_more(2, 100));
        assert!(!info.has_more(3, 100));
    }

    #[test]
    fn total_count_is_fallback() {
        let info = CloudflareResultInfo {
            per_page: Some(100),
            total_count: Some(150),
            ..Default::default()
        };
        assert!(info.has_more(1, 100));
        assert!(!info.has_more(2, 100));
    }

    #[test]
    fn no_metadata_means_single_page() {
        assert!(!CloudflareResultInfo::default().has_more(1, 100));
    }

    #[test]
    fn error_summary_joins_messages() {
        let response: CloudflareResponse<serde_json::Value> = serde_json::from_str(
            r#"{"success":false,"errors":[{"code":9109,"message":"Invalid access token"},{"code":7003,"message":"Could not route"}],"result":null}"#,
        )
        .unwrap();

        assert_eq!(
            response.error_summary(),
            "Invalid access token (code 9109); Could not route (code 7003)"
        );
    }
}
