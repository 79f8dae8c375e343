use serde::{Deserialize, Serialize};

/// One currency row as extracted from the bank page.
///
/// Every rate is either a finite number or absent; absence means the page
/// showed no quote for that instrument and direction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    pub currency: String,
    #[serde(default)]
    pub currency_name: String,
    pub cash_buy: Option<f64>,
    pub cash_sell: Option<f64>,
    pub spot_buy: Option<f64>,
    pub spot_sell: Option<f64>,
}

impl RateRecord {
    pub fn new(currency: impl Into<String>, currency_name: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            currency_name: currency_name.into(),
            ..Self::default()
        }
    }

    pub fn with_cash(mut self, buy: Option<f64>, sell: Option<f64>) -> Self {
        self.cash_buy = finite(buy);
        self.cash_sell = finite(sell);
        self
    }

    pub fn with_spot(mut self, buy: Option<f64>, sell: Option<f64>) -> Self {
        self.spot_buy = finite(buy);
        self.spot_sell = finite(sell);
        self
    }

    pub fn cash_pair(&self) -> QuotePair {
        QuotePair::new(self.cash_buy, self.cash_sell)
    }

    pub fn spot_pair(&self) -> QuotePair {
        QuotePair::new(self.spot_buy, self.spot_sell)
    }
}

/// Buy/sell quotes for one category (cash or spot).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuotePair {
    pub buy: Option<f64>,
    pub sell: Option<f64>,
}

impl QuotePair {
    pub const fn new(buy: Option<f64>, sell: Option<f64>) -> Self {
        Self { buy, sell }
    }

    /// Arithmetic mean of buy and sell, present only when both sides are.
    pub fn mid(self) -> Option<f64> {
        match (self.buy, self.sell) {
            (Some(buy), Some(sell)) => Some((buy + sell) / 2.0),
            _ => None,
        }
    }
}

/// Display-ready row: a repaired [`RateRecord`] plus derived mid rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedRate {
    #[serde(flatten)]
    pub rate: RateRecord,
    pub cash_mid: Option<f64>,
    pub spot_mid: Option<f64>,
}

impl CalculatedRate {
    /// Derives mid rates from `rate` as given; no buy/sell repair happens here.
    pub fn from_record(rate: RateRecord) -> Self {
        let cash_mid = rate.cash_pair().mid();
        let spot_mid = rate.spot_pair().mid();
        Self {
            rate,
            cash_mid,
            spot_mid,
        }
    }

    pub fn currency(&self) -> &str {
        self.rate.currency.as_str()
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|number| number.is_finite())
}
