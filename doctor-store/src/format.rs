// Display formatting for dates, ages and money

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown for absent values.
pub const EMPTY: &str = "-";

/// `Jan 5, 2024`, or `-` when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| EMPTY.to_string(), |d| d.format("%b %-d, %Y").to_string())
}

pub fn format_age(age: Option<u32>) -> String {
    match age {
        Some(1) => "1 year".to_string(),
        Some(years) => format!("{years} years"),
        None => EMPTY.to_string(),
    }
}

/// US dollars with thousands separators: `$1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 5)), "Jan 5, 2024");
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2023, 12, 25)), "Dec 25, 2023");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_format_currency() {
        let money = |s: &str| Decimal::from_str(s).unwrap();
        assert_eq!(format_currency(money("1234.5")), "$1,234.50");
        assert_eq!(format_currency(money("0")), "$0.00");
        assert_eq!(format_currency(money("999.999")), "$1,000.00");
        assert_eq!(format_currency(money("1234567.891")), "$1,234,567.89");
        assert_eq!(format_currency(money("-42.1")), "-$42.10");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Some(1)), "1 year");
        assert_eq!(format_age(Some(34)), "34 years");
        assert_eq!(format_age(None), "-");
    }
}
