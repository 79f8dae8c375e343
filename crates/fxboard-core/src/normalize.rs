use crate::domain::{CalculatedRate, QuotePair, RateRecord};

/// Swaps an inverted pair so that buy <= sell. Pairs with a missing side are untouched.
pub fn repair_pair(pair: QuotePair) -> QuotePair {
    match (pair.buy, pair.sell) {
        (Some(buy), Some(sell)) if buy > sell => QuotePair::new(Some(sell), Some(buy)),
        _ => pair,
    }
}

/// Repairs the cash and spot pairs of `record` independently.
pub fn repair_record(mut record: RateRecord) -> RateRecord {
    let cash = repair_pair(record.cash_pair());
    let spot = repair_pair(record.spot_pair());

    record.cash_buy = cash.buy;
    record.cash_sell = cash.sell;
    record.spot_buy = spot.buy;
    record.spot_sell = spot.sell;
    record
}

/// Repairs every record and derives mid rates, keeping input order.
pub fn normalize(records: Vec<RateRecord>) -> Vec<CalculatedRate> {
    records
        .into_iter()
        .map(repair_record)
        .map(CalculatedRate::from_record)
        .collect()
}
