/// Currencies the extractor asks for, with the display names the bank page
/// uses for them in Traditional Chinese.
pub const TARGET_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "美金"),
    ("HKD", "港幣"),
    ("GBP", "英鎊"),
    ("AUD", "澳幣"),
    ("CAD", "加拿大幣"),
    ("SGD", "新加坡幣"),
    ("CHF", "瑞士法郎"),
    ("JPY", "日圓"),
    ("ZAR", "南非幣"),
    ("SEK", "瑞典幣"),
    ("NZD", "紐元"),
    ("THB", "泰幣"),
    ("PHP", "菲國比索"),
    ("IDR", "印尼幣"),
    ("EUR", "歐元"),
    ("KRW", "韓元"),
    ("VND", "越南盾"),
    ("MYR", "馬來幣"),
    ("CNY", "人民幣"),
];

/// Currencies pinned to the top of the board, in this order.
pub const DISPLAY_PRIORITY: &[&str] = &["CNY", "USD", "JPY", "EUR", "HKD", "AUD"];

pub fn display_name(code: &str) -> Option<&'static str> {
    TARGET_CURRENCIES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Position of `code` in [`DISPLAY_PRIORITY`], if pinned.
pub fn display_rank(code: &str) -> Option<usize> {
    DISPLAY_PRIORITY.iter().position(|candidate| *candidate == code)
}
