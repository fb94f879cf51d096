//! Uploaded document bookkeeping: vocabularies, stored names, display size.

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::types::DbId;

pub const CATEGORY_ACADEMIC: &str = "academic";
pub const CATEGORY_APPLICATION: &str = "application";
pub const CATEGORY_FINANCIAL: &str = "financial";
pub const CATEGORY_IDENTITY: &str = "identity";

pub const VALID_DOCUMENT_CATEGORIES: &[&str] = &[
    CATEGORY_ACADEMIC,
    CATEGORY_APPLICATION,
    CATEGORY_FINANCIAL,
    CATEGORY_IDENTITY,
];

/// Category used when an upload does not name one.
pub const DEFAULT_DOCUMENT_CATEGORY: &str = CATEGORY_ACADEMIC;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_VERIFIED: &str = "verified";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_MISSING: &str = "missing";

pub const VALID_DOCUMENT_STATUSES: &[&str] =
    &[STATUS_PENDING, STATUS_VERIFIED, STATUS_REJECTED, STATUS_MISSING];

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Longest sanitized filename component kept in the stored name.
const MAX_FILENAME_LEN: usize = 200;

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_DOCUMENT_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid document category '{category}'. Must be one of: {}",
            VALID_DOCUMENT_CATEGORIES.join(", ")
        )))
    }
}

/// Human-readable size: kilobytes with one decimal, megabytes with two
/// once the file exceeds 1 MiB.
pub fn size_label(bytes: u64) -> String {
    if bytes > MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    }
}

/// Upper-cased extension of the original filename, or `None` without one.
pub fn file_type(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_uppercase())
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Directory parts are stripped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. An empty result falls back to `"upload"`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// On-disk name for an upload: `{user_id}_{yyyymmddHHMMSS}_{sanitized}`.
pub fn stored_filename(user_id: DbId, uploaded_at: DateTime<Utc>, filename: &str) -> String {
    format!(
        "{user_id}_{}_{}",
        uploaded_at.format("%Y%m%d%H%M%S"),
        sanitize_filename(filename)
    )
}
