use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Invoice data as extracted. Every field is optional: the model reports
/// what the document contains and validation reports what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "party_or_name")]
    pub vendor: Option<Party>,
    #[serde(default, deserialize_with = "party_or_name")]
    pub customer: Option<Party>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub subtotal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub tax: Option<f64>,
    /// Percentage, e.g. `8.5` for 8.5%.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub tax_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Party {
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.address, &self.phone, &self.email]
            .iter()
            .all(|f| f.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// One invoice row. `total` is the amount printed on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: Option<f64>,
}

impl LineItem {
    /// quantity × unit_price, when both are known.
    pub fn computed_total(&self) -> Option<f64> {
        Some(self.quantity? * self.unit_price?)
    }

    /// The amount this row contributes to the invoice: the computed total,
    /// else the stated one.
    pub fn amount(&self) -> Option<f64> {
        self.computed_total().or(self.total)
    }
}

/// Result of `validate_invoice`. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceReport {
    pub data: InvoiceRecord,
    pub validation: ValidationReport,
}

/// Reads a monetary amount from a JSON number or a string like `"$1,250.00"`.
pub fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_amount))
}

/// Accepts either a full party object or a bare name string.
fn party_or_name<'de, D>(deserializer: D) -> Result<Option<Party>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Name(String),
        Full(Party),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Name(name)) => Some(Party {
            name: Some(name),
            ..Party::default()
        }),
        Some(Repr::Full(party)) => Some(party),
        None => None,
    })
}
