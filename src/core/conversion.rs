//! Rate resolution and conversion arithmetic

use crate::core::error::{FxError, FxResult, NoRateReason};
use crate::core::rate::RateRecord;
use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of calendar months a rate stays eligible before a transaction.
pub const LOOKBACK_MONTHS: u32 = 6;

/// First day of the lookback window ending at `transaction_date`.
///
/// Month arithmetic clamps to the last valid day, so 2024-08-31 maps to 2024-02-29.
pub fn lookback_start(transaction_date: NaiveDate) -> NaiveDate {
    transaction_date
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Picks the most recent record dated on or before `transaction_date`.
pub fn resolve_rate(records: &[RateRecord], transaction_date: NaiveDate) -> FxResult<RateRecord> {
    if records.is_empty() {
        return Err(FxError::NoEligibleRate(NoRateReason::NoData));
    }

    records
        .iter()
        .filter_map(|record| record.record_date.map(|date| (date, record)))
        .filter(|(date, _)| *date <= transaction_date)
        .max_by_key(|(date, _)| *date)
        .map(|(_, record)| record.clone())
        .ok_or(FxError::NoEligibleRate(NoRateReason::OutsideWindow))
}

pub fn ensure_positive(amount: Decimal) -> FxResult<()> {
    if amount <= Decimal::ZERO {
        return Err(FxError::invalid(
            "The transaction original value must be a positive non-zero value.",
        ));
    }
    Ok(())
}

/// Converts `amount` with `rate`, rounding half-up to two decimal places.
pub fn convert(amount: Decimal, rate: Decimal) -> FxResult<Decimal> {
    ensure_positive(amount)?;

    amount
        .checked_mul(rate)
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| FxError::invalid("The converted amount is out of range."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_on(day: NaiveDate) -> RateRecord {
        RateRecord::new("Brazil", "Real", day, dec!(5.0))
    }

    #[test]
    fn test_resolve_picks_latest_not_after_transaction() {
        let records = vec![
            record_on(date(2024, 1, 1)),
            record_on(date(2024, 3, 1)),
            record_on(date(2024, 6, 1)),
        ];

        let selected = resolve_rate(&records, date(2024, 5, 1)).unwrap();
        assert_eq!(selected.record_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_resolve_accepts_same_day_rate() {
        let records = vec![record_on(date(2024, 3, 1)), record_on(date(2024, 6, 1))];
        let selected = resolve_rate(&records, date(2024, 6, 1)).unwrap();
        assert_eq!(selected.record_date, Some(date(2024, 6, 1)));
    }

    #[test]
    fn test_resolve_fails_when_all_candidates_are_later() {
        let records = vec![
            record_on(date(2024, 1, 1)),
            record_on(date(2024, 3, 1)),
            record_on(date(2024, 6, 1)),
        ];

        let err = resolve_rate(&records, date(2023, 12, 1)).unwrap_err();
        assert_eq!(err, FxError::NoEligibleRate(NoRateReason::OutsideWindow));
    }

    #[test]
    fn test_resolve_ignores_undated_records() {
        let mut undated = record_on(date(2024, 1, 1));
        undated.record_date = None;

        let err = resolve_rate(&[undated], date(2024, 5, 1)).unwrap_err();
        assert_eq!(err, FxError::NoEligibleRate(NoRateReason::OutsideWindow));
    }

    #[test]
    fn test_resolve_without_candidates() {
        let err = resolve_rate(&[], date(2024, 5, 1)).unwrap_err();
        assert_eq!(err, FxError::NoEligibleRate(NoRateReason::NoData));
    }

    #[test]
    fn test_convert_rounds_half_up() {
        let rate = dec!(1.2332);
        let cases = [
            (dec!(9.828), dec!(12.12)),
            (dec!(9.829), dec!(12.12)),
            (dec!(9.830), dec!(12.12)),
            (dec!(9.831), dec!(12.12)),
            (dec!(9.832), dec!(12.12)),
            (dec!(9.833), dec!(12.13)),
            (dec!(9.834), dec!(12.13)),
            (dec!(9.835), dec!(12.13)),
            (dec!(9.836), dec!(12.13)),
            (dec!(9.837), dec!(12.13)),
        ];

        for (amount, expected) in cases {
            assert_eq!(convert(amount, rate).unwrap(), expected, "amount {amount}");
        }
    }

    #[test]
    fn test_convert_exact_midpoint_rounds_away_from_zero() {
        assert_eq!(convert(dec!(0.125), dec!(1)).unwrap(), dec!(0.13));
        assert_eq!(convert(dec!(1.005), dec!(1)).unwrap(), dec!(1.01));
        assert_eq!(convert(dec!(2.5), dec!(0.001)).unwrap(), dec!(0.00));
    }

    #[test]
    fn test_convert_rejects_non_positive_amounts() {
        for amount in [dec!(0), dec!(0.00), dec!(-1)] {
            let err = convert(amount, dec!(1.5)).unwrap_err();
            assert_eq!(
                err,
                FxError::invalid("The transaction original value must be a positive non-zero value.")
            );
        }
    }

    #[test]
    fn test_lookback_start_clamps_month_end() {
        assert_eq!(lookback_start(date(2024, 8, 31)), date(2024, 2, 29));
        assert_eq!(lookback_start(date(2024, 5, 1)), date(2023, 11, 1));
    }
}
