use serde::Serialize;

/// Sentiment assigned to one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Chart order: negative, positive, neutral.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Negative,
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
    ];

    /// Maps the classifier's raw `sentiment` value to a label.
    ///
    /// Only the exact strings `"Positive"` and `"Negative"` are recognised;
    /// anything else, including a missing field, is Neutral.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("Positive") => SentimentLabel::Positive,
            Some("Negative") => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified comment, in retrieval order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRow {
    /// 1-based position in the fetched batch.
    pub index: usize,
    pub text: String,
    pub label: SentimentLabel,
}

/// Per-label comment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl Tally {
    /// Counts labels across the full row sequence.
    #[must_use]
    pub fn from_rows(rows: &[ClassifiedRow]) -> Self {
        let mut tally = Tally::default();
        for row in rows {
            match row.label {
                SentimentLabel::Positive => tally.positive += 1,
                SentimentLabel::Negative => tally.negative += 1,
                SentimentLabel::Neutral => tally.neutral += 1,
            }
        }
        tally
    }

    #[must_use]
    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// `(label, count)` pairs in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub content_id: String,
    pub rows: Vec<ClassifiedRow>,
    pub tally: Tally,
    /// Rows recorded as Neutral because classification failed under the
    /// `neutral` failure policy. Always 0 under `abort`.
    pub degraded: usize,
}
