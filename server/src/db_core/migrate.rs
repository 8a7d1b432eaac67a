//! Idempotent schema migration, run once at process startup. Every
//! statement must be safe to re-run; schema evolution happens by appending
//! `ADD COLUMN IF NOT EXISTS` statements, never by mutating the write path.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS mailbox (
        id SERIAL PRIMARY KEY,
        address VARCHAR(320) NOT NULL UNIQUE,
        maildir TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS email_analysis (
        id SERIAL PRIMARY KEY,
        mailbox VARCHAR(320) NOT NULL,
        email_id VARCHAR(255) NOT NULL,
        summary TEXT,
        categories JSONB NOT NULL DEFAULT '[]',
        priority_score INTEGER NOT NULL DEFAULT 5,
        is_phishing BOOLEAN NOT NULL DEFAULT FALSE,
        phishing_score REAL NOT NULL DEFAULT 0.0,
        sensitive_data BOOLEAN NOT NULL DEFAULT FALSE,
        auto_reply_suggestion TEXT,
        processing_time DOUBLE PRECISION NOT NULL DEFAULT 0.0,
        analyzed_at TIMESTAMPTZ NOT NULL,
        conversation_id VARCHAR(64) NOT NULL,
        tasks JSONB NOT NULL DEFAULT '[]',
        meeting JSONB,
        tone VARCHAR(32) NOT NULL DEFAULT 'neutral',
        sentiment_score REAL NOT NULL DEFAULT 0.0,
        language VARCHAR(32) NOT NULL DEFAULT 'english',
        entities JSONB NOT NULL DEFAULT '{}',
        smart_replies JSONB NOT NULL DEFAULT '[]',
        thread_context TEXT,
        predicted_response_minutes INTEGER NOT NULL DEFAULT 120,
        model_used VARCHAR(128) NOT NULL DEFAULT '',
        error TEXT,
        CONSTRAINT email_analysis_mailbox_email_id_key UNIQUE (mailbox, email_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_email_analysis_conversation
        ON email_analysis (conversation_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_email_analysis_analyzed_at
        ON email_analysis (analyzed_at)
    "#,
];

pub async fn run(conn: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in MIGRATIONS {
        conn.execute(Statement::from_string(
            conn.get_database_backend(),
            (*sql).to_string(),
        ))
        .await?;
    }
    tracing::info!("Schema migration complete ({} statements)", MIGRATIONS.len());
    Ok(())
}
