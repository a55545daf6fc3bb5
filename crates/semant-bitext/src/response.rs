//! Decoding, cleanup and parsing of the service's XML reply.
//!
//! The reply looks like:
//!
//! ```xml
//! <?xml version="1.0" encoding="ISO-8859-1"?>
//! <RESULT>
//!   <BLOCK><ID>1</ID><GLOBAL_VALUE>-0.5</GLOBAL_VALUE><TEXT>...</TEXT></BLOCK>
//! </RESULT>
//! ```
//!
//! The service sometimes wraps tag boundaries in stray double quotes
//! (`<ID>"1"</ID>`), which [`normalize_body`] removes before parsing.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::bytes::Regex;

use crate::error::BitextError;

static ENCODING_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bencoding="([^"]*)""#).expect("valid encoding regex")
});

/// One scored segment of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentBlock {
    pub id: String,
    pub value: f64,
    pub text: String,
}

/// The parsed reply for one document, blocks in response order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentPayload {
    pub blocks: Vec<SentimentBlock>,
}

/// Pick the encoding declared by an `encoding="..."` attribute.
///
/// Falls back to UTF-8 when nothing is declared, and also when the declared
/// encoding is not ASCII-compatible (UTF-16), since the declaration could
/// only be found because the bytes read as ASCII.
///
/// # Errors
///
/// Returns [`BitextError::UnknownEncoding`] for labels that name no known encoding.
pub fn detect_encoding(body: &[u8]) -> Result<&'static Encoding, BitextError> {
    let Some(label) = ENCODING_DECL.captures(body).and_then(|c| c.get(1)) else {
        return Ok(UTF_8);
    };
    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        BitextError::UnknownEncoding(String::from_utf8_lossy(label.as_bytes()).into_owned())
    })?;
    if encoding.is_ascii_compatible() {
        Ok(encoding)
    } else {
        Ok(UTF_8)
    }
}

/// Decode raw body bytes with the encoding their prolog declares.
///
/// A byte-order mark for that encoding is dropped. Byte sequences that are
/// invalid in the encoding become U+FFFD.
///
/// # Errors
///
/// Returns [`BitextError::UnknownEncoding`] if the declared label does not
/// resolve to an encoding.
pub fn decode_body(body: &[u8]) -> Result<String, BitextError> {
    let encoding = detect_encoding(body)?;
    let (text, had_errors) = encoding.decode_with_bom_removal(body);
    if had_errors {
        tracing::debug!(
            encoding = encoding.name(),
            "response body has invalid byte sequences; replaced"
        );
    }
    Ok(text.into_owned())
}

/// Strip line breaks and collapse the quoted tag boundaries the service emits.
#[must_use]
pub fn normalize_body(body: &str) -> String {
    body.replace(['\r', '\n'], "")
        .replace(">\"", ">")
        .replace("\"<", "<")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Value,
    Text,
}

#[derive(Default)]
struct BlockBuilder {
    id: String,
    value: Option<String>,
    text: String,
}

impl BlockBuilder {
    fn push(&mut self, field: Field, chunk: &str) {
        match field {
            Field::Id => self.id.push_str(chunk),
            Field::Value => self.value.get_or_insert_with(String::new).push_str(chunk),
            Field::Text => self.text.push_str(chunk),
        }
    }

    fn finish(self, index: usize) -> Result<SentimentBlock, BitextError> {
        let raw = self.value.ok_or_else(|| {
            BitextError::Malformed(format!("BLOCK #{index} has no GLOBAL_VALUE"))
        })?;
        let value = raw.trim().parse::<f64>().map_err(|e| {
            BitextError::Malformed(format!(
                "BLOCK #{index} GLOBAL_VALUE '{raw}' is not a number: {e}"
            ))
        })?;
        if !value.is_finite() {
            return Err(BitextError::Malformed(format!(
                "BLOCK #{index} GLOBAL_VALUE '{raw}' is not finite"
            )));
        }
        Ok(SentimentBlock {
            id: self.id,
            value,
            text: self.text,
        })
    }
}

fn field_for(name: &[u8]) -> Option<Field> {
    match name {
        b"ID" => Some(Field::Id),
        b"GLOBAL_VALUE" => Some(Field::Value),
        b"TEXT" => Some(Field::Text),
        _ => None,
    }
}

/// Parse a normalized reply into its blocks.
///
/// Elements other than `BLOCK` under `RESULT`, and other than `ID`,
/// `GLOBAL_VALUE` and `TEXT` under `BLOCK`, are skipped.
///
/// # Errors
///
/// Returns [`BitextError::Xml`] if the body is not well-formed and
/// [`BitextError::Malformed`] if it does not have the expected shape.
pub fn parse_payload(xml: &str) -> Result<SentimentPayload, BitextError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut block: Option<BlockBuilder> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                let name = name.as_ref();
                if depth == 0 {
                    check_root(name, saw_root)?;
                    saw_root = true;
                } else if depth == 1 && name == b"BLOCK" {
                    block = Some(BlockBuilder::default());
                } else if depth == 2 && block.is_some() {
                    field = field_for(name);
                    if field == Some(Field::Value) {
                        if let Some(b) = block.as_mut() {
                            b.value.get_or_insert_with(String::new);
                        }
                    }
                }
                depth += 1;
            }
            Event::Empty(e) => {
                let name = e.name();
                let name = name.as_ref();
                if depth == 0 {
                    check_root(name, saw_root)?;
                    saw_root = true;
                } else if depth == 1 && name == b"BLOCK" {
                    blocks.push(BlockBuilder::default().finish(blocks.len() + 1)?);
                } else if depth == 2 && field_for(name) == Some(Field::Value) {
                    if let Some(b) = block.as_mut() {
                        b.value.get_or_insert_with(String::new);
                    }
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 2 {
                    field = None;
                } else if depth == 1 && e.name().as_ref() == b"BLOCK" {
                    if let Some(done) = block.take() {
                        blocks.push(done.finish(blocks.len() + 1)?);
                    }
                }
            }
            Event::Text(e) => {
                if let (Some(f), Some(b), 3) = (field, block.as_mut(), depth) {
                    b.push(f, &e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let (Some(f), Some(b), 3) = (field, block.as_mut(), depth) {
                    b.push(f, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(BitextError::Malformed(
            "missing RESULT root element".to_string(),
        ));
    }
    if depth != 0 {
        return Err(BitextError::Malformed(
            "document ended before RESULT was closed".to_string(),
        ));
    }

    Ok(SentimentPayload { blocks })
}

fn check_root(name: &[u8], saw_root: bool) -> Result<(), BitextError> {
    if saw_root {
        return Err(BitextError::Malformed(
            "more than one root element".to_string(),
        ));
    }
    if name != b"RESULT" {
        return Err(BitextError::Malformed(format!(
            "expected RESULT root element, found <{}>",
            String::from_utf8_lossy(name)
        )));
    }
    Ok(())
}

/// Decode, normalize and parse a raw response body.
///
/// # Errors
///
/// Any decoding, well-formedness or shape error.
pub fn parse_body(body: &[u8]) -> Result<SentimentPayload, BitextError> {
    let text = decode_body(body)?;
    parse_payload(&normalize_body(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RESULT>
  <BLOCK>
    <ID>1</ID>
    <GLOBAL_VALUE>0.75</GLOBAL_VALUE>
    <TEXT>I love this phone.</TEXT>
  </BLOCK>
  <BLOCK>
    <ID>2</ID>
    <GLOBAL_VALUE>-0.25</GLOBAL_VALUE>
    <TEXT>The battery is weak.</TEXT>
  </BLOCK>
</RESULT>"#;

    #[test]
    fn parses_blocks_in_order() {
        let payload = parse_body(SAMPLE.as_bytes()).expect("should parse");
        assert_eq!(payload.blocks.len(), 2);
        assert_eq!(payload.blocks[0].id, "1");
        assert!((payload.blocks[0].value - 0.75).abs() < f64::EPSILON);
        assert_eq!(payload.blocks[0].text, "I love this phone.");
        assert_eq!(payload.blocks[1].id, "2");
        assert!((payload.blocks[1].value + 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_strips_line_breaks() {
        assert_eq!(normalize_body("<A>\r\n<B>x</B>\n</A>\r"), "<A><B>x</B></A>");
    }

    #[test]
    fn normalize_collapses_quoted_boundaries() {
        assert_eq!(
            normalize_body(r#"<ID>"7"</ID><TEXT>"hi"</TEXT>"#),
            "<ID>7</ID><TEXT>hi</TEXT>"
        );
    }

    #[test]
    fn quoted_artifacts_parse_like_clean_body() {
        let quoted = r#"<?xml version="1.0" encoding="UTF-8"?>
<RESULT>
<BLOCK><ID>"1"</ID><GLOBAL_VALUE>"0.75"</GLOBAL_VALUE><TEXT>"I love this phone."</TEXT></BLOCK>
<BLOCK><ID>"2"</ID><GLOBAL_VALUE>"-0.25"</GLOBAL_VALUE><TEXT>"The battery is weak."</TEXT></BLOCK>
</RESULT>"#;
        let clean = parse_body(SAMPLE.as_bytes()).expect("clean parses");
        let dirty = parse_body(quoted.as_bytes()).expect("quoted parses");
        assert_eq!(clean, dirty);
    }

    #[test]
    fn quoted_value_without_normalization_is_rejected() {
        let xml = r#"<RESULT><BLOCK><ID>1</ID><GLOBAL_VALUE>"0.5"</GLOBAL_VALUE></BLOCK></RESULT>"#;
        let err = parse_payload(xml).unwrap_err();
        assert!(matches!(err, BitextError::Malformed(_)), "got: {err:?}");
    }

    #[test]
    fn detects_declared_latin1() {
        let body = br#"<?xml version="1.0" encoding="ISO-8859-1"?><RESULT/>"#;
        let encoding = detect_encoding(body).expect("known label");
        assert_eq!(encoding, encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn defaults_to_utf8_without_declaration() {
        let encoding = detect_encoding(b"<RESULT/>").expect("no label");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn utf16_declaration_falls_back_to_utf8() {
        let body = br#"<?xml version="1.0" encoding="utf-16"?><RESULT/>"#;
        assert_eq!(detect_encoding(body).expect("known label"), UTF_8);
    }

    #[test]
    fn unknown_encoding_label_is_an_error() {
        let body = br#"<?xml version="1.0" encoding="x-made-up"?><RESULT/>"#;
        let err = detect_encoding(body).unwrap_err();
        assert!(
            matches!(err, BitextError::UnknownEncoding(ref label) if label == "x-made-up"),
            "got: {err:?}"
        );
    }

    #[test]
    fn latin1_body_is_decoded_with_declared_encoding() {
        let mut body =
            br#"<?xml version="1.0" encoding="ISO-8859-1"?><RESULT><BLOCK><ID>1</ID><GLOBAL_VALUE>0.5</GLOBAL_VALUE><TEXT>caf"#
                .to_vec();
        body.push(0xE9);
        body.extend_from_slice(b"</TEXT></BLOCK></RESULT>");

        let payload = parse_body(&body).expect("latin-1 body parses");
        assert_eq!(payload.blocks[0].text, "caf\u{e9}");
    }

    #[test]
    fn stray_byte_in_utf8_body_is_replaced_and_block_still_scores() {
        let mut body =
            b"<RESULT><BLOCK><ID>1</ID><GLOBAL_VALUE>0.5</GLOBAL_VALUE><TEXT>caf".to_vec();
        body.push(0xE9);
        body.extend_from_slice(b"</TEXT></BLOCK></RESULT>");

        let payload = parse_body(&body).expect("stray byte is not fatal");
        assert_eq!(payload.blocks.len(), 1);
        assert!((payload.blocks[0].value - 0.5).abs() < f64::EPSILON);
        assert_eq!(payload.blocks[0].text, "caf\u{fffd}");
    }

    #[test]
    fn utf8_bom_is_removed() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(SAMPLE.as_bytes());
        let payload = parse_body(&body).expect("bom body parses");
        assert_eq!(payload.blocks.len(), 2);
    }

    #[test]
    fn empty_result_has_no_blocks() {
        let payload = parse_payload("<RESULT></RESULT>").expect("should parse");
        assert!(payload.blocks.is_empty());
        let payload = parse_payload("<RESULT/>").expect("should parse");
        assert!(payload.blocks.is_empty());
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = parse_payload("<ERROR>bad credentials</ERROR>").unwrap_err();
        assert!(
            matches!(err, BitextError::Malformed(ref msg) if msg.contains("<ERROR>")),
            "got: {err:?}"
        );
    }

    #[test]
    fn missing_value_is_rejected() {
        let err = parse_payload("<RESULT><BLOCK><ID>1</ID><TEXT>x</TEXT></BLOCK></RESULT>")
            .unwrap_err();
        assert!(
            matches!(err, BitextError::Malformed(ref msg) if msg.contains("BLOCK #1")),
            "got: {err:?}"
        );
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = parse_payload(
            "<RESULT><BLOCK><GLOBAL_VALUE>abc</GLOBAL_VALUE></BLOCK></RESULT>",
        )
        .unwrap_err();
        assert!(matches!(err, BitextError::Malformed(_)), "got: {err:?}");
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let err = parse_payload(
            "<RESULT><BLOCK><GLOBAL_VALUE>NaN</GLOBAL_VALUE></BLOCK></RESULT>",
        )
        .unwrap_err();
        assert!(matches!(err, BitextError::Malformed(_)), "got: {err:?}");
    }

    #[test]
    fn mismatched_tags_are_xml_errors() {
        let err = parse_payload("<RESULT><BLOCK></RESULT>").unwrap_err();
        assert!(matches!(err, BitextError::Xml(_)), "got: {err:?}");
    }

    #[test]
    fn unclosed_root_is_rejected() {
        assert!(parse_payload("<RESULT><BLOCK><GLOBAL_VALUE>1</GLOBAL_VALUE></BLOCK>").is_err());
    }

    #[test]
    fn plain_text_body_is_rejected() {
        assert!(parse_payload("Service unavailable").is_err());
    }

    #[test]
    fn unknown_elements_are_skipped() {
        let xml = "<RESULT><META>v2</META><BLOCK><ID>1</ID><POLARITY>P</POLARITY>\
                   <GLOBAL_VALUE>1.5</GLOBAL_VALUE><TEXT>ok</TEXT></BLOCK></RESULT>";
        let payload = parse_payload(xml).expect("should parse");
        assert_eq!(payload.blocks.len(), 1);
        assert!((payload.blocks[0].value - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let xml = "<RESULT><BLOCK><GLOBAL_VALUE>0</GLOBAL_VALUE>\
                   <TEXT>salt &amp; pepper</TEXT></BLOCK></RESULT>";
        let payload = parse_payload(xml).expect("should parse");
        assert_eq!(payload.blocks[0].text, "salt & pepper");
    }
}
