//! Maildir-style mail storage: one directory per mailbox, one file per
//! message under `cur/`, filename doubling as the message id.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct MaildirStore {
    root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFile {
    pub id: String,
    pub path: PathBuf,
}

impl MaildirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }

    fn cur_dir(&self, maildir: &str) -> PathBuf {
        self.root.join(maildir).join("cur")
    }

    pub fn message_path(&self, maildir: &str, email_id: &str) -> PathBuf {
        self.cur_dir(maildir).join(email_id)
    }

    /// List up to `limit` message files for one mailbox, sorted by filename
    /// so repeated cycles see a stable order. A missing directory is a
    /// `NotFound` the caller is expected to log and skip.
    pub async fn list_messages(&self, maildir: &str, limit: usize) -> AppResult<Vec<MessageFile>> {
        let dir = self.cur_dir(maildir);
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
            AppError::NotFound(format!("maildir {} unavailable: {}", dir.display(), e))
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Internal(e.into()))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            files.push(MessageFile {
                id: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
            });
        }

        files.sort_by(|a, b| a.id.cmp(&b.id));
        files.truncate(limit);
        Ok(files)
    }

    pub async fn read_message(&self, path: &Path) -> AppResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            AppError::NotFound(format!("message file {} unavailable: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_maildir_is_not_found() {
        let store = MaildirStore::new("/nonexistent/vmail/root");
        let result = store.list_messages("example.com/alice", 10).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_messages_caps_and_sorts() {
        let root = std::env::temp_dir().join(format!("maildir-test-{}", std::process::id()));
        let cur = root.join("example.com/alice/cur");
        tokio::fs::create_dir_all(&cur).await.unwrap();
        for name in ["c.eml", "a.eml", "b.eml", "d.eml"] {
            tokio::fs::write(cur.join(name), b"x").await.unwrap();
        }

        let store = MaildirStore::new(&root);
        let files = store.list_messages("example.com/alice", 3).await.unwrap();

        assert_eq!(
            files.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
            vec!["a.eml", "b.eml", "c.eml"]
        );

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
