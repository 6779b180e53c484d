// Prompt templates for the generic extraction tasks.
// Placeholders are filled with `llm_client::prompts::render`.

/// Replace: {entity_types}, {text}
pub const ENTITIES_PROMPT_TEMPLATE: &str = r#"Extract named entities from the following text and return them as a JSON object.

Entity types to extract: {entity_types}

Text: {text}

Return ONLY a valid JSON object with entity types as keys and arrays of entities as values. Example format:
{
  "people": ["John Doe", "Jane Smith"],
  "organizations": ["Company A"],
  "locations": ["New York"],
  "dates": ["January 2024"],
  "money": ["$1,000"],
  "products": ["Product X"]
}"#;

/// Replace: {length}, {style}, {focus}, {text}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the following text.

Length: {length}
Style: {style}{focus}

Text to summarize:
{text}

Summary:"#;

/// Replace: {text}
pub const SENTIMENT_PROMPT_TEMPLATE: &str = r#"Analyze the sentiment and emotional tone of the following text.

Text: {text}

Return a JSON object with:
- overall_sentiment: "positive", "negative", or "neutral"
- confidence: 0.0 to 1.0
- emotions: list of detected emotions
- key_phrases: list of phrases that influenced the sentiment
- reasoning: brief explanation

Return ONLY valid JSON:"#;

/// Replace: {schema}, {text}
pub const STRUCTURED_PROMPT_TEMPLATE: &str = r#"Extract structured data from the following text according to the provided schema.

Schema:
{schema}

Text:
{text}

Return ONLY valid JSON matching the schema. Use null for fields the text does not mention:"#;

pub const SINGLE_LABEL_INSTRUCTION: &str = "Choose only ONE category that best fits.";
pub const MULTI_LABEL_INSTRUCTION: &str = "The text can belong to multiple categories, or none of them.";

/// Replace: {categories}, {label_instruction}, {text}, {answer_format}
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Classify the following text into one or more of these categories:
{categories}

{label_instruction}

Text: {text}

Return your answer as a JSON object:
{answer_format}

Use the category names exactly as listed. Return ONLY valid JSON:"#;

pub const SINGLE_LABEL_FORMAT: &str = r#"{"category": "category1"}"#;
pub const MULTI_LABEL_FORMAT: &str = r#"{"categories": ["category1", "category2"]}"#;

/// Replace: {information_types}, {text}
pub const KEY_INFORMATION_PROMPT_TEMPLATE: &str = r#"Extract the following information from the text:
{information_types}

Text:
{text}

Return the extracted information as a JSON object with the information types as keys.
Use a string for a single value, an array of strings for several values, and null when the text does not contain it.
Return ONLY valid JSON:"#;
