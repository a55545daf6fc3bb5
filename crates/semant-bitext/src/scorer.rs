//! Score aggregation and polarity labelling.

use crate::error::BitextError;
use crate::response::SentimentPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative,
    Positive,
    Neutral,
}

impl Polarity {
    /// Classify a score by its sign; exactly zero is neutral.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.0 {
            Polarity::Negative
        } else if score > 0.0 {
            Polarity::Positive
        } else {
            Polarity::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Negative => "negative",
            Polarity::Positive => "positive",
            Polarity::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean of all block values.
///
/// # Errors
///
/// Returns [`BitextError::EmptyResult`] when the payload has no blocks.
pub fn aggregate_score(payload: &SentimentPayload) -> Result<f64, BitextError> {
    if payload.blocks.is_empty() {
        return Err(BitextError::EmptyResult);
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = payload.blocks.len() as f64;
    let sum: f64 = payload.blocks.iter().map(|b| b.value).sum();
    Ok(sum / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::SentimentBlock;

    fn payload(values: &[f64]) -> SentimentPayload {
        SentimentPayload {
            blocks: values
                .iter()
                .enumerate()
                .map(|(i, &value)| SentimentBlock {
                    id: (i + 1).to_string(),
                    value,
                    text: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn mean_of_values() {
        let score = aggregate_score(&payload(&[1.0, -0.5, 2.0])).expect("non-empty");
        assert!((score - 2.5 / 3.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn single_block_is_its_own_mean() {
        let score = aggregate_score(&payload(&[-3.25])).expect("non-empty");
        assert!((score + 3.25).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_payload_is_an_error() {
        let err = aggregate_score(&payload(&[])).unwrap_err();
        assert!(matches!(err, BitextError::EmptyResult));
    }

    #[test]
    fn opposing_values_cancel_to_neutral() {
        let score = aggregate_score(&payload(&[0.5, -0.5])).expect("non-empty");
        assert_eq!(Polarity::from_score(score), Polarity::Neutral);
    }

    #[test]
    fn polarity_follows_sign() {
        assert_eq!(Polarity::from_score(-0.01), Polarity::Negative);
        assert_eq!(Polarity::from_score(0.01), Polarity::Positive);
        assert_eq!(Polarity::from_score(0.0), Polarity::Neutral);
        assert_eq!(Polarity::from_score(-0.0), Polarity::Neutral);
    }

    #[test]
    fn polarity_labels() {
        assert_eq!(Polarity::Negative.to_string(), "negative");
        assert_eq!(Polarity::Positive.as_str(), "positive");
        assert_eq!(Polarity::Neutral.as_str(), "neutral");
    }
}
