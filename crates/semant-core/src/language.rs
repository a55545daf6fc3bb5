//! Languages and response formats understood by the scoring service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    Portuguese,
    Italian,
    French,
    German,
    Catalan,
    Dutch,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Spanish,
        Language::Portuguese,
        Language::Italian,
        Language::French,
        Language::German,
        Language::Catalan,
        Language::Dutch,
    ];

    /// ISO 639-1 code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
            Language::Italian => "it",
            Language::French => "fr",
            Language::German => "de",
            Language::Catalan => "ca",
            Language::Dutch => "nl",
        }
    }

    /// English name, as accepted by `FromStr`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Portuguese => "Portuguese",
            Language::Italian => "Italian",
            Language::French => "French",
            Language::German => "German",
            Language::Catalan => "Catalan",
            Language::Dutch => "Dutch",
        }
    }

    /// Three-letter abbreviation sent to the service in the `Lang` field.
    #[must_use]
    pub fn service_code(self) -> &'static str {
        match self {
            Language::English => "ENG",
            Language::Spanish => "ESP",
            Language::Portuguese => "POR",
            Language::Italian => "ITA",
            Language::French => "FRA",
            Language::German => "DEU",
            Language::Catalan => "CAT",
            Language::Dutch => "NLD",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    /// Accepts ISO 639-1 codes (`en`) or English names (`english`), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "en" | "english" => Ok(Language::English),
            "es" | "spanish" => Ok(Language::Spanish),
            "pt" | "portuguese" => Ok(Language::Portuguese),
            "it" | "italian" => Ok(Language::Italian),
            "fr" | "french" => Ok(Language::French),
            "de" | "german" => Ok(Language::German),
            "ca" | "catalan" => Ok(Language::Catalan),
            "nl" | "dutch" => Ok(Language::Dutch),
            _ => Err(format!("unsupported language '{s}'")),
        }
    }
}

/// Response format requested through the `OutFormat` field.
///
/// Only XML responses are parsed, so it is the only variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xml => write!(f, "XML"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("xml") {
            Ok(OutputFormat::Xml)
        } else {
            Err(format!("unsupported output format '{s}'; only xml is supported"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert_eq!("Spanish".parse::<Language>(), Ok(Language::Spanish));
        assert_eq!(" DE ".parse::<Language>(), Ok(Language::German));
    }

    #[test]
    fn rejects_unknown_language() {
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn service_codes_are_three_uppercase_letters() {
        for lang in Language::ALL {
            let code = lang.service_code();
            assert_eq!(code.len(), 3, "{lang}");
            assert!(code.chars().all(|c| c.is_ascii_uppercase()), "{lang}");
        }
    }

    #[test]
    fn code_round_trips_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>(), Ok(lang));
        }
    }

    #[test]
    fn name_parses_back_to_the_same_language() {
        for lang in Language::ALL {
            assert_eq!(lang.name().parse::<Language>(), Ok(lang));
        }
    }

    #[test]
    fn output_format_displays_uppercase() {
        assert_eq!(OutputFormat::Xml.to_string(), "XML");
        assert_eq!("xml".parse::<OutputFormat>(), Ok(OutputFormat::Xml));
        assert!("json".parse::<OutputFormat>().is_err());
    }
}
