pub mod maildir;
pub mod normalized_message;

pub use maildir::{MaildirStore, MessageFile};
pub use normalized_message::NormalizedMessage;
