//! `semant score`: run the Bitext executor over a document set.

use std::path::PathBuf;

use semant_bitext::{BitextClient, BitextExecutor};
use semant_core::{
    AppConfig, DocumentSet, ExecutionContext, ExecutionSummary, Language, ProgressAction,
    ProgressEvent, ProgressObserver,
};
use serde::Serialize;

pub(crate) struct ScoreArgs {
    pub documents: Option<PathBuf>,
    pub language: Option<Language>,
    pub endpoint: Option<String>,
    pub debug: bool,
    pub max_failures: Option<usize>,
}

/// Logs every progress event and cancels the run once the failure budget is spent.
pub(crate) struct FailureBudget {
    max_failures: Option<usize>,
}

impl FailureBudget {
    pub(crate) fn new(max_failures: Option<usize>) -> Self {
        Self { max_failures }
    }
}

impl ProgressObserver for FailureBudget {
    fn on_progress(&mut self, provider: &str, event: &ProgressEvent) -> ProgressAction {
        tracing::info!(
            provider,
            status = %event.status,
            processed = event.processed,
            failed = event.failed,
            total = event.total,
            reason = event.reason.as_deref().unwrap_or(""),
            "progress"
        );

        match self.max_failures {
            Some(max) if event.failed >= max => {
                tracing::warn!(max_failures = max, "failure budget exhausted; cancelling");
                ProgressAction::Cancel
            }
            _ => ProgressAction::Continue,
        }
    }
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    summary: ExecutionSummary,
    documents: &'a DocumentSet,
}

/// Load the document set, score it, and print the report as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the documents file cannot be loaded, the endpoint is
/// invalid, or the report cannot be serialized. Per-document failures are
/// part of the report, not errors.
pub(crate) async fn run_score(config: &AppConfig, args: ScoreArgs) -> anyhow::Result<()> {
    let path = args.documents.as_ref().unwrap_or(&config.documents_path);
    let documents = semant_core::load_documents(path)?.into_document_set();
    tracing::info!(path = %path.display(), count = documents.len(), "loaded documents");

    let mut settings = config.execution_settings();
    if let Some(language) = args.language {
        settings.language = language;
    }
    settings.debug |= args.debug;

    let endpoint = args.endpoint.as_deref().unwrap_or(&config.bitext_endpoint);
    let client =
        BitextClient::with_endpoint(endpoint, config.request_timeout_secs, &config.user_agent)?;
    let executor = BitextExecutor::new(client);

    let mut context = ExecutionContext::new(settings, documents);
    let mut observer = FailureBudget::new(args.max_failures);
    let summary = executor.execute(&mut context, &mut observer).await;

    let report = ScoreReport {
        summary,
        documents: &context.documents,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
