//! Bitext sentiment executor.
//!
//! Sends each document of an [`semant_core::ExecutionContext`] to the Bitext
//! scoring service, parses the XML reply, records one averaged polarity score
//! per document and reports progress after every document. Failures stay at
//! the document level: they are recorded as a `failed` output and reported
//! through the progress stream, never returned to the caller.

pub mod client;
pub mod error;
pub mod executor;
pub mod request;
pub mod response;
pub mod scorer;

pub use client::{BitextClient, ServiceReply};
pub use error::BitextError;
pub use executor::{BitextExecutor, FAILED_LABEL, MAX_SOURCE_CHARS, PROVIDER};
pub use request::SentimentRequest;
pub use response::{SentimentBlock, SentimentPayload};
pub use scorer::{aggregate_score, Polarity};
