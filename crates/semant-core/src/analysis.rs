//! Execution context and progress protocol shared by sentiment executors.
//!
//! The caller builds an [`ExecutionContext`], hands it to an executor together
//! with a [`ProgressObserver`], and reads the per-document [`AnalysisOutput`]s
//! back once the executor returns. The observer is the only in-band control
//! channel: returning [`ProgressAction::Cancel`] stops the run after the
//! document that produced the event.

use serde::{Deserialize, Serialize};

use crate::language::{Language, OutputFormat};

/// Service credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"[redacted]")
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// One named result attached to a document by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub provider: String,
    pub score: f64,
    pub label: String,
}

/// A source text plus the outputs recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    id: String,
    source: String,
    outputs: Vec<AnalysisOutput>,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn outputs(&self) -> &[AnalysisOutput] {
        &self.outputs
    }

    /// Append an output. Existing outputs are never modified.
    pub fn add_output(&mut self, provider: &str, score: f64, label: &str) {
        self.outputs.push(AnalysisOutput {
            provider: provider.to_string(),
            score,
            label: label.to_string(),
        });
    }
}

/// Insertion-ordered mapping from document id to [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, keyed by `id`.
    ///
    /// Re-inserting an existing id replaces its source text and clears its
    /// outputs while keeping its position in the iteration order.
    pub fn insert(&mut self, id: impl Into<String>, source: impl Into<String>) {
        let document = Document::new(id, source);
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Document> {
        self.documents.iter_mut()
    }
}

impl<K, V> FromIterator<(K, V)> for DocumentSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (id, source) in iter {
            set.insert(id, source);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Read-only settings an executor needs for every request.
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    pub credentials: Credentials,
    pub language: Language,
    pub format: OutputFormat,
    pub debug: bool,
}

/// Everything one executor run works on.
///
/// `settings` is only read; `documents` receive one output each.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub settings: ExecutionSettings,
    pub documents: DocumentSet,
}

impl ExecutionContext {
    #[must_use]
    pub fn new(settings: ExecutionSettings, documents: DocumentSet) -> Self {
        Self {
            settings,
            documents,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// A document was handled (also used for HTTP-level rejections).
    Processed,
    /// A document failed locally or while talking to the service.
    Failed,
    /// Nothing to do: the document set was empty.
    Canceled,
    /// Terminal summary after the loop ends, including after cancellation.
    Success,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Processed => write!(f, "processed"),
            ExecutionStatus::Failed => write!(f, "failed"),
            ExecutionStatus::Canceled => write!(f, "canceled"),
            ExecutionStatus::Success => write!(f, "success"),
        }
    }
}

/// Running totals reported after each document and once at the end.
///
/// `processed + failed <= total` holds for every event an executor emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub status: ExecutionStatus,
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ProgressEvent {
    #[must_use]
    pub fn new(status: ExecutionStatus, total: usize, processed: usize, failed: usize) -> Self {
        Self {
            status,
            total,
            processed,
            failed,
            reason: None,
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// What the caller wants the executor to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    Continue,
    Cancel,
}

/// Receives progress events from an executor.
///
/// The returned action is checked right after each per-document event; the
/// action returned for the terminal event is ignored.
pub trait ProgressObserver {
    fn on_progress(&mut self, provider: &str, event: &ProgressEvent) -> ProgressAction;
}

impl<F> ProgressObserver for F
where
    F: FnMut(&str, &ProgressEvent) -> ProgressAction,
{
    fn on_progress(&mut self, provider: &str, event: &ProgressEvent) -> ProgressAction {
        self(provider, event)
    }
}

/// Final counts of one executor run, returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
    /// `true` when the observer requested cancellation before the set was exhausted.
    pub canceled: bool,
}
