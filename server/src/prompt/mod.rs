pub mod analysis;
pub mod ollama;
pub mod router;

pub use router::PromptTask;
