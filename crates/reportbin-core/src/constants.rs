//! Shared constants.

/// Header carrying the shared upload secret on every gated route.
pub const UPLOAD_PASSWORD_HEADER: &str = "x-upload-password";

/// The only media type accepted by the upload intake.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 52_428_800;

/// Default lifetime of signed read URLs: 7 days.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 60 * 60 * 24 * 7;

pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_REPORTS_TABLE: &str = "reports";

/// Extension appended to a report id to form its object key.
pub const REPORT_FILE_EXTENSION: &str = "html";
