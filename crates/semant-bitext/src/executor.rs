//! Per-document scoring loop.

use std::time::Instant;

use reqwest::StatusCode;
use semant_core::{
    Document, ExecutionContext, ExecutionSettings, ExecutionStatus, ExecutionSummary,
    ProgressAction, ProgressEvent, ProgressObserver,
};

use crate::client::{BitextClient, ServiceReply};
use crate::error::BitextError;
use crate::request::SentimentRequest;
use crate::scorer::{aggregate_score, Polarity};

/// Provider name used for outputs and progress events.
pub const PROVIDER: &str = "Bitext";

/// Documents longer than this many characters are failed without a request.
pub const MAX_SOURCE_CHARS: usize = 8192;

/// Label recorded, with score `0`, for every document that could not be scored.
pub const FAILED_LABEL: &str = "failed";

enum Outcome {
    Scored(f64),
    Rejected(StatusCode),
}

/// Scores every document of an [`ExecutionContext`] through a [`BitextClient`].
pub struct BitextExecutor {
    client: BitextClient,
}

impl BitextExecutor {
    #[must_use]
    pub fn new(client: BitextClient) -> Self {
        Self { client }
    }

    /// Score all documents in order, one request at a time.
    ///
    /// Each document gets exactly one output: the averaged score with its
    /// polarity label, or score `0` with label `failed`. After every document
    /// the observer receives a progress event; returning
    /// [`ProgressAction::Cancel`] stops the loop and leaves the remaining
    /// documents untouched. A terminal [`ExecutionStatus::Success`] event is
    /// always emitted once the loop ends, cancelled or not.
    ///
    /// Statuses per document:
    /// - scored: `Processed`
    /// - oversize or request/parse error: `Failed`, with the error as reason
    /// - HTTP status other than 200/202: `Processed` with the failure counted
    ///   in `failed` and the status as reason. Callers that key off the status
    ///   alone have always seen `Processed` here, so it is kept.
    ///
    /// An empty document set produces a single `Canceled` event with all
    /// counts at zero.
    pub async fn execute<O>(
        &self,
        context: &mut ExecutionContext,
        observer: &mut O,
    ) -> ExecutionSummary
    where
        O: ProgressObserver + ?Sized,
    {
        let total = context.documents.len();
        if total == 0 {
            tracing::info!(provider = PROVIDER, "no documents to score");
            observer.on_progress(
                PROVIDER,
                &ProgressEvent::new(ExecutionStatus::Canceled, 0, 0, 0),
            );
            return ExecutionSummary {
                total: 0,
                processed: 0,
                failed: 0,
                canceled: false,
            };
        }

        let settings = &context.settings;
        tracing::info!(
            provider = PROVIDER,
            total,
            language = %settings.language,
            "starting sentiment run"
        );

        let mut processed = 0usize;
        let mut failed = 0usize;
        let mut canceled = false;

        for document in context.documents.iter_mut() {
            let event = if document.source().chars().count() > MAX_SOURCE_CHARS {
                failed += 1;
                document.add_output(PROVIDER, 0.0, FAILED_LABEL);
                tracing::warn!(
                    document = document.id(),
                    max_chars = MAX_SOURCE_CHARS,
                    "document exceeds size limit; not sent"
                );
                ProgressEvent::new(ExecutionStatus::Failed, total, processed, failed)
            } else {
                match self.score_document(settings, document).await {
                    Ok(Outcome::Scored(score)) => {
                        processed += 1;
                        let polarity = Polarity::from_score(score);
                        document.add_output(PROVIDER, score, polarity.as_str());
                        tracing::debug!(
                            document = document.id(),
                            score,
                            %polarity,
                            "document scored"
                        );
                        ProgressEvent::new(ExecutionStatus::Processed, total, processed, failed)
                    }
                    Ok(Outcome::Rejected(status)) => {
                        failed += 1;
                        document.add_output(PROVIDER, 0.0, FAILED_LABEL);
                        tracing::warn!(
                            document = document.id(),
                            %status,
                            "service rejected document"
                        );
                        ProgressEvent::new(ExecutionStatus::Processed, total, processed, failed)
                            .with_reason(format!("HTTP status {status}"))
                    }
                    Err(e) => {
                        failed += 1;
                        document.add_output(PROVIDER, 0.0, FAILED_LABEL);
                        tracing::warn!(
                            document = document.id(),
                            error = %e,
                            "document scoring failed"
                        );
                        ProgressEvent::new(ExecutionStatus::Failed, total, processed, failed)
                            .with_reason(e.to_string())
                    }
                }
            };

            if observer.on_progress(PROVIDER, &event) == ProgressAction::Cancel {
                tracing::info!(
                    document = document.id(),
                    processed,
                    failed,
                    "run cancelled by observer"
                );
                canceled = true;
                break;
            }
        }

        observer.on_progress(
            PROVIDER,
            &ProgressEvent::new(ExecutionStatus::Success, total, processed, failed),
        );
        tracing::info!(
            provider = PROVIDER,
            total,
            processed,
            failed,
            canceled,
            "sentiment run finished"
        );

        ExecutionSummary {
            total,
            processed,
            failed,
            canceled,
        }
    }

    async fn score_document(
        &self,
        settings: &ExecutionSettings,
        document: &Document,
    ) -> Result<Outcome, BitextError> {
        let request = SentimentRequest::new(settings, document);
        let started = Instant::now();
        let reply = self.client.analyze(&request).await;

        if settings.debug {
            tracing::info!(
                document = document.id(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "sentiment retrieved"
            );
        }

        match reply? {
            ServiceReply::Rejected(status) => Ok(Outcome::Rejected(status)),
            ServiceReply::Scored(payload) => aggregate_score(&payload).map(Outcome::Scored),
        }
    }
}
