use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::DocumentSet;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentsFile {
    pub documents: Vec<DocumentEntry>,
}

impl DocumentsFile {
    /// Convert into a [`DocumentSet`], keeping file order.
    #[must_use]
    pub fn into_document_set(self) -> DocumentSet {
        self.documents
            .into_iter()
            .map(|entry| (entry.id, entry.text))
            .collect()
    }
}

/// Load and validate a document set from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_documents(path: &Path) -> Result<DocumentsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DocumentsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_documents(&content)
}

fn parse_documents(content: &str) -> Result<DocumentsFile, ConfigError> {
    let documents_file: DocumentsFile = serde_yaml::from_str(content)?;
    validate_documents(&documents_file)?;
    Ok(documents_file)
}

fn validate_documents(documents_file: &DocumentsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for entry in &documents_file.documents {
        if entry.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "document id must be non-empty".to_string(),
            ));
        }

        if !seen_ids.insert(entry.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate document id: '{}'",
                entry.id
            )));
        }
    }

    Ok(())
}
