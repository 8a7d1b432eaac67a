pub mod email_analysis;
pub mod mailbox;
