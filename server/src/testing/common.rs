//! Shared fixtures for unit and integration tests.

use chrono::{TimeZone, Utc};

use crate::email::NormalizedMessage;
use crate::signals::{self, SignalReport};

/// A minimal single-part plain-text RFC-822 message.
pub fn raw_message(subject: &str, from: &str, to: &str, body: &str) -> Vec<u8> {
    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         Date: Thu, 7 Aug 2025 10:00:00 +0000\r\n\
         Message-ID: <test@example.com>\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}"
    )
    .into_bytes()
}

/// A single-part HTML message, for markup-stripping tests.
pub fn raw_html_message(subject: &str, from: &str, to: &str, html: &str) -> Vec<u8> {
    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         Date: Thu, 7 Aug 2025 10:00:00 +0000\r\n\
         Message-ID: <test@example.com>\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         \r\n\
         {html}"
    )
    .into_bytes()
}

pub fn sample_signal_report() -> SignalReport {
    let message = NormalizedMessage {
        subject: "Project Update".to_string(),
        from: "alice@example.com".to_string(),
        to: "bob@example.com".to_string(),
        date: "2025-08-07T09:00:00Z".to_string(),
        body: "Please send the report by tomorrow.".to_string(),
    };
    let now = Utc.with_ymd_and_hms(2025, 8, 7, 9, 0, 0).unwrap();
    signals::extract(&message, now)
}

#[cfg(feature = "integration")]
pub async fn setup() -> (sea_orm::DatabaseConnection, crate::HttpClient) {
    use sea_orm::{ConnectOptions, Database};
    use std::env;

    dotenvy::dotenv().ok();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let mut db_options = ConnectOptions::new(db_url);
    db_options.sqlx_logging(false);

    let conn = Database::connect(db_options)
        .await
        .expect("Database connection failed");

    crate::db_core::migrate::run(&conn)
        .await
        .expect("Migration failed");

    let http_client = reqwest::Client::new();
    (conn, http_client)
}
