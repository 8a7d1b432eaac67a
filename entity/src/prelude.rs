pub use super::email_analysis::Entity as EmailAnalysis;
pub use super::mailbox::Entity as Mailbox;
