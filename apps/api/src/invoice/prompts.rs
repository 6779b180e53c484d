use serde_json::{json, Value};

/// Field descriptions sent with every full invoice extraction.
pub fn invoice_schema() -> Value {
    json!({
        "invoice_number": "string",
        "invoice_date": "string (YYYY-MM-DD format)",
        "due_date": "string (YYYY-MM-DD format)",
        "vendor": {
            "name": "string",
            "address": "string",
            "phone": "string",
            "email": "string"
        },
        "customer": {
            "name": "string",
            "address": "string",
            "phone": "string",
            "email": "string"
        },
        "line_items": [
            {
                "description": "string",
                "quantity": "number",
                "unit_price": "number",
                "total": "number"
            }
        ],
        "subtotal": "number",
        "tax": "number",
        "tax_rate": "number (percentage)",
        "total": "number",
        "currency": "string (ISO code like USD, EUR)",
        "payment_terms": "string",
        "payment_method": "string",
        "notes": "string"
    })
}

/// Replace: {invoice_text}
pub const LINE_ITEMS_PROMPT_TEMPLATE: &str = r#"Extract all line items from this invoice.

Invoice:
{invoice_text}

Return ONLY a JSON object with a "line_items" array. Each line item has:
- description
- quantity
- unit_price
- total

Copy amounts exactly as printed; do not recalculate them.

Format:
{
  "line_items": [
    {
      "description": "Item name",
      "quantity": 2,
      "unit_price": 50.00,
      "total": 100.00
    }
  ]
}"#;
