//! Already-analyzed markers with per-key expiry. Presence of a live marker
//! means "skip unless forced"; expiry silently re-opens the key, which is
//! fine because the persistence layer upserts.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::Utc;

const NAMESPACE: &str = "llm:processed";

#[derive(Debug, Clone)]
pub struct DedupStore {
    inner: Arc<RwLock<HashMap<String, i64>>>,
    ttl_secs: i64,
}

impl DedupStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl_secs,
        }
    }

    fn key(mailbox: &str, email_id: &str) -> String {
        format!("{NAMESPACE}:{mailbox}:{email_id}")
    }

    pub fn is_marked(&self, mailbox: &str, email_id: &str) -> bool {
        self.inner
            .read()
            .unwrap()
            .get(&Self::key(mailbox, email_id))
            .is_some_and(|expires_at| *expires_at > Utc::now().timestamp())
    }

    pub fn mark(&self, mailbox: &str, email_id: &str) {
        let expires_at = Utc::now().timestamp() + self.ttl_secs;
        self.inner
            .write()
            .unwrap()
            .insert(Self::key(mailbox, email_id), expires_at);
    }

    /// Drop expired markers. Wired to a periodic scheduler job so the map
    /// does not grow without bound.
    pub fn clean_store(&self) {
        let now = Utc::now().timestamp();
        self.inner
            .write()
            .unwrap()
            .retain(|_, expires_at| *expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    #[cfg(test)]
    fn insert_raw(&self, mailbox: &str, email_id: &str, expires_at: i64) {
        self.inner
            .write()
            .unwrap()
            .insert(Self::key(mailbox, email_id), expires_at);
    }
}
