use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Entity category → entities in the order the model listed them.
pub type EntityMap = BTreeMap<String, Vec<String>>;

pub const DEFAULT_ENTITY_TYPES: &[&str] = &[
    "people",
    "organizations",
    "locations",
    "dates",
    "money",
    "products",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn guideline(&self) -> &'static str {
        match self {
            SummaryLength::Short => "2-3 sentences",
            SummaryLength::Medium => "1 paragraph (4-6 sentences)",
            SummaryLength::Long => "2-3 paragraphs",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Paragraph,
    Bullets,
    Executive,
}

impl SummaryStyle {
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryStyle::Paragraph => "Write in clear, concise paragraphs.",
            SummaryStyle::Bullets => "Use bullet points for key information.",
            SummaryStyle::Executive => "Write as an executive summary with key takeaways.",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryOptions {
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub style: SummaryStyle,
    #[serde(default)]
    pub focus: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Labels are matched ignoring case and surrounding whitespace.
impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(de::Error::unknown_variant(
                &label,
                &["positive", "negative", "neutral"],
            )),
        }
    }
}

/// Fixed-key sentiment result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub overall_sentiment: Sentiment,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

/// Single-label classification yields one category, multi-label a subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Classification {
    Single(String),
    Multi(Vec<String>),
}

impl Classification {
    /// Every category the result names, in order.
    pub fn categories(&self) -> Vec<&str> {
        match self {
            Classification::Single(c) => vec![c.as_str()],
            Classification::Multi(cs) => cs.iter().map(String::as_str).collect(),
        }
    }
}

/// A key-information value: one string, or a list when the text holds several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyInformation {
    Text(String),
    List(Vec<String>),
}

/// Raw reply shape of the classification prompt.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ClassificationReply {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}
