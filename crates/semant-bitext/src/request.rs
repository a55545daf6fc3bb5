//! Form body construction for the scoring endpoint.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use semant_core::{Credentials, Document, ExecutionSettings, Language, OutputFormat};

/// Bytes left unescaped in form values, besides ASCII alphanumerics.
///
/// Space is escaped here and then written as `+`.
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// One scoring request: the settings of the run plus a single document.
#[derive(Debug, Clone, Copy)]
pub struct SentimentRequest<'a> {
    pub credentials: &'a Credentials,
    pub format: OutputFormat,
    pub language: Language,
    pub id: &'a str,
    pub text: &'a str,
}

impl<'a> SentimentRequest<'a> {
    #[must_use]
    pub fn new(settings: &'a ExecutionSettings, document: &'a Document) -> Self {
        Self {
            credentials: &settings.credentials,
            format: settings.format,
            language: settings.language,
            id: document.id(),
            text: document.source(),
        }
    }

    /// Field name/value pairs in the order the service expects them.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, String); 9] {
        [
            ("User", self.credentials.key.clone()),
            ("Pass", self.credentials.secret.clone()),
            ("OutFormat", self.format.to_string()),
            ("Detail", "Global".to_string()),
            ("Normalized", "No".to_string()),
            ("Theme", "Gen".to_string()),
            ("ID", self.id.to_string()),
            ("Lang", self.language.service_code().to_string()),
            ("Text", self.text.to_string()),
        ]
    }

    /// Encode as `application/x-www-form-urlencoded`, `&`-joined with no
    /// trailing separator.
    #[must_use]
    pub fn to_form_body(&self) -> String {
        self.fields()
            .iter()
            .map(|(name, value)| format!("{name}={}", encode_form_value(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode_form_value(value: &str) -> String {
    utf8_percent_encode(value, FORM_VALUE)
        .map(|chunk| if chunk == "%20" { "+" } else { chunk })
        .collect()
}
