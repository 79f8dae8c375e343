//! Repair and total coercion of model output.
//!
//! The model's JSON is untrusted: nothing here may panic or let a NaN through.

use serde_json::Value;

use crate::domain::RateRecord;
use crate::error::PipelineError;

/// Removes every ```` ```json ```` (any case) and ```` ``` ```` fence.
pub fn strip_code_fences(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(index) = rest.find("```") {
        cleaned.push_str(&rest[..index]);
        rest = &rest[index + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    cleaned.push_str(rest);
    cleaned
}

/// Slice between the first `[` and the last `]`, inclusive.
///
/// Falls back to the trimmed text when no such pair exists.
pub fn json_payload(cleaned: &str) -> &str {
    match (cleaned.find('['), cleaned.rfind(']')) {
        (Some(start), Some(end)) if end > start => &cleaned[start..=end],
        _ => cleaned.trim(),
    }
}

/// Parses raw completion text into coerced records.
pub fn parse_records(raw: &str) -> Result<Vec<RateRecord>, PipelineError> {
    let cleaned = strip_code_fences(raw);
    let payload = json_payload(&cleaned);

    let value: Value = serde_json::from_str(payload)
        .map_err(|error| PipelineError::malformed(format!("invalid JSON: {error}")))?;

    let Value::Array(items) = value else {
        return Err(PipelineError::malformed("top-level value is not an array"));
    };

    if items.is_empty() {
        return Err(PipelineError::malformed("array is empty"));
    }

    Ok(items.iter().map(coerce_record).collect())
}

/// Coerces one array element; never fails.
pub fn coerce_record(item: &Value) -> RateRecord {
    RateRecord {
        currency: coerce_text(item.get("currency")),
        currency_name: coerce_text(item.get("currencyName")),
        cash_buy: coerce_rate(item.get("cashBuy")),
        cash_sell: coerce_rate(item.get("cashSell")),
        spot_buy: coerce_rate(item.get("spotBuy")),
        spot_sell: coerce_rate(item.get("spotSell")),
    }
}

pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

/// Finite number or absent. `null`, `"-"`, blanks and non-numeric shapes are absent.
pub fn coerce_rate(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() || text == "-" {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}
