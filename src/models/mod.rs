pub mod job;

pub use job::{CompletionRecord, CredentialParams, JobParams, JobRequest, UsmParams};
