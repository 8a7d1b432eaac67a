//! Batch scheduling: one cycle enumerates the active mailboxes, lists up to
//! a batch of message files each, and drives the pipeline per message.
//! Failures are isolated — a broken mailbox or message never takes the
//! cycle down with it.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::model::mailbox::MailboxCtrl;
use crate::server_config::cfg;
use crate::state::pipeline::{AnalysisPipeline, ProcessOutcome};
use crate::ServerState;

const MAX_CONCURRENT_MESSAGES: usize = 4;

/// One scheduler tick. The try-lock guard keeps cycles from overlapping: a
/// tick that fires while the previous cycle is still draining is skipped.
pub async fn run_batch_cycle(
    state: ServerState,
    pipeline: AnalysisPipeline,
    cycle_guard: Arc<Mutex<()>>,
) {
    let Ok(_guard) = cycle_guard.try_lock() else {
        tracing::warn!("Previous batch cycle still running, skipping this tick");
        return;
    };

    tracing::info!("Starting batch processing cycle");

    let mailboxes = match MailboxCtrl::all_active(&state.conn).await {
        Ok(mailboxes) => mailboxes,
        Err(e) => {
            tracing::error!("Could not enumerate active mailboxes: {:?}", e);
            return;
        }
    };

    for mailbox in mailboxes {
        let files = match state
            .mail_store
            .list_messages(&mailbox.maildir, cfg.settings.batch_size)
            .await
        {
            Ok(files) => files,
            Err(AppError::NotFound(msg)) => {
                tracing::warn!("Skipping mailbox {}: {}", mailbox.address, msg);
                continue;
            }
            Err(e) => {
                tracing::error!("Error listing mailbox {}: {:?}", mailbox.address, e);
                continue;
            }
        };

        let address = mailbox.address.clone();
        stream::iter(files)
            .for_each_concurrent(MAX_CONCURRENT_MESSAGES, |file| {
                let pipeline = pipeline.clone();
                let address = address.clone();
                async move {
                    match pipeline.process(&address, &file.id, &file.path, false).await {
                        Ok(ProcessOutcome::Analyzed(_)) => {
                            tracing::debug!("Analyzed {}/{}", address, file.id);
                        }
                        Ok(ProcessOutcome::Skipped) => {}
                        Err(e) => {
                            tracing::error!("Error processing {}/{}: {:?}", address, file.id, e);
                        }
                    }
                }
            })
            .await;
    }

    tracing::info!("Batch processing cycle complete");
}

#[cfg(test)]
#[cfg(feature = "integration")]
mod integration_tests {
    use super::*;
    use crate::db_core::prelude::*;
    use crate::email::MaildirStore;
    use crate::state::dedup_store::DedupStore;
    use crate::testing::common::setup;
    use chrono::Utc;

    #[tokio::test]
    async fn test_cycle_survives_a_mailbox_with_missing_storage() {
        let (conn, http_client) = setup().await;

        let address = format!("ghost-{}@example.com", std::process::id());
        mailbox::ActiveModel {
            address: Set(address.clone()),
            maildir: Set("does/not/exist".to_string()),
            active: Set(true),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .insert(&conn)
        .await
        .unwrap();

        let state = crate::ServerState {
            http_client,
            conn: conn.clone(),
            dedup_store: DedupStore::new(86400),
            mail_store: MaildirStore::new("/nonexistent/vmail"),
        };
        let pipeline = crate::state::pipeline::AnalysisPipeline::new(
            state.conn.clone(),
            state.http_client.clone(),
            state.dedup_store.clone(),
            state.mail_store.clone(),
        );

        // must complete without panicking and without writing records
        run_batch_cycle(state, pipeline, Arc::new(Mutex::new(()))).await;

        let written = EmailAnalysis::find()
            .filter(email_analysis::Column::Mailbox.eq(address.clone()))
            .count(&conn)
            .await
            .unwrap();
        assert_eq!(written, 0);

        Mailbox::delete_many()
            .filter(mailbox::Column::Address.eq(address))
            .exec(&conn)
            .await
            .unwrap();
    }
}
