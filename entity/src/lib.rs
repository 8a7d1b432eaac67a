pub mod email_analysis;
pub mod mailbox;
pub mod prelude;
