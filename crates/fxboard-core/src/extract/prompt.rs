use crate::domain::currency::TARGET_CURRENCIES;

/// Field names the model must emit, in column order.
pub const RECORD_FIELDS: &[&str] = &[
    "currency",
    "currencyName",
    "cashBuy",
    "cashSell",
    "spotBuy",
    "spotSell",
];

pub const DEFAULT_EXCERPT_CAP: usize = 150_000;

/// Builds the extraction instruction around at most `excerpt_cap` characters of `source`.
pub fn build_prompt(source: &str, excerpt_cap: usize) -> String {
    let excerpt = excerpt(source, excerpt_cap);
    let codes = TARGET_CURRENCIES
        .iter()
        .map(|(code, _)| *code)
        .collect::<Vec<_>>()
        .join(", ");
    let names = TARGET_CURRENCIES
        .iter()
        .map(|(code, name)| format!("{code}->{name}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Task: Extract exchange rates from text to JSON.\n\
         Source: {excerpt}\n\
         \n\
         Rules:\n\
         1. Output strictly a JSON Array. No markdown formatting.\n\
         2. Fields: {fields}. Use null for \"-\".\n\
         3. currency is the ISO code; currencyName is the name in Traditional Chinese ({names}).\n\
         4. Target: {codes}.\n",
        fields = RECORD_FIELDS.join(", "),
    )
}

/// Leading `cap` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
