use regex::Regex;
use std::sync::OnceLock;

use crate::error::{BoxError, Result};

fn folder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/folder/(\d+)").expect("folder pattern is valid"))
}

/// Extracts the numeric folder ID from a Box folder URL.
///
/// The first `/folder/<digits>` occurrence wins, so
/// `https://app.box.com/folder/123?s=abc` yields `"123"`. A URL without that
/// segment is rejected before any request is made.
pub fn extract_folder_id(url: &str) -> Result<String> {
    folder_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| BoxError::InvalidFolderUrl(url.to_string()))
}
