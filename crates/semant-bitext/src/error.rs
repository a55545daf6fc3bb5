use thiserror::Error;

/// Errors raised while scoring a single document.
///
/// The executor turns every variant into a `failed` output; the `Display`
/// text becomes the progress event's reason.
#[derive(Debug, Error)]
pub enum BitextError {
    /// Network, timeout or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The XML is well-formed but does not have the `RESULT/BLOCK` shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The prolog declares an encoding label that is not recognised.
    #[error("unknown response encoding '{0}'")]
    UnknownEncoding(String),

    /// The response contained no scored blocks.
    #[error("response contains no sentiment blocks")]
    EmptyResult,

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
