//! Shared key and URL generation.
//!
//! Object key format: `{id}.html`. Public URL format: `{app_url}/reports/{id}`.

use reportbin_core::constants::REPORT_FILE_EXTENSION;
use uuid::Uuid;

/// Object key under which a report's bytes are stored.
pub fn report_file_path(id: Uuid) -> String {
    format!("{}.{}", id, REPORT_FILE_EXTENSION)
}

/// Externally visible URL of a report's public view.
pub fn public_report_url(app_url: &str, id: Uuid) -> String {
    format!("{}/reports/{}", app_url.trim_end_matches('/'), id)
}

/// Percent-encode each path segment of an object key, keeping `/` separators.
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
