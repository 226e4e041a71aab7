//! Test helpers: build the router over an in-memory backend.
//!
//! Run from workspace root: `cargo test -p reportbin-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use reportbin_api::setup;
use reportbin_core::models::{Report, ReportStatus};
use reportbin_core::Config;
use reportbin_storage::{Backend, MemoryBackend};
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "secret";
pub const TEST_APP_URL: &str = "https://reports.example.com";
pub const PASSWORD_HEADER: &str = "x-upload-password";

/// Test application: server plus a handle on the backend it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub backend: MemoryBackend,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(max_file_size: Option<usize>) -> Config {
    Config::from_source(move |key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "UPLOAD_PASSWORD" => Some(TEST_PASSWORD.to_string()),
        "APP_URL" => Some(TEST_APP_URL.to_string()),
        "MAX_FILE_SIZE" => max_file_size.map(|n| n.to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_limit(None)
}

pub fn setup_test_app_with_limit(max_file_size: Option<usize>) -> TestApp {
    let backend = MemoryBackend::new();
    let (_state, router) = setup::build_app(
        test_config(max_file_size),
        Backend::from_shared(backend.clone()),
    )
    .expect("build app");
    let server = TestServer::new(router).expect("test server");
    TestApp { server, backend }
}

pub fn html_part(filename: &str, body: &str) -> MultipartForm {
    file_part(filename, "text/html", body.as_bytes().to_vec())
}

pub fn file_part(filename: &str, mime: &str, body: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(body).file_name(filename).mime_type(mime),
    )
}

/// Insert a report row and its object directly into the backend.
pub fn seed_report(app: &TestApp, status: ReportStatus, html: &str) -> Report {
    seed_report_at(app, status, html, Utc::now())
}

pub fn seed_report_at(
    app: &TestApp,
    status: ReportStatus,
    html: &str,
    created_at: chrono::DateTime<Utc>,
) -> Report {
    let id = Uuid::new_v4();
    let mut report = Report::new_active(
        id,
        format!("seed-{}.html", &id.to_string()[..8]),
        format!("{}.html", id),
        format!("{}/reports/{}", TEST_APP_URL, id),
        created_at,
    );
    report.status = status;
    app.backend.seed(report.clone(), html.as_bytes().to_vec());
    report
}

pub fn minutes_ago(minutes: i64) -> chrono::DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}
