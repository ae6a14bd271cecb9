use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// fallback for anything that does not parse as a number
pub const ZERO_AMOUNT: &str = "0.00";

/// key rewritten by the deep normalizer
pub const AMOUNT_KEY: &str = "amount";

/// Money type with 2 decimal places, the precision the gateway accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    /// largest amount that still carries two decimal places
    pub const MAX: Money = Money(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, 2));
    pub const MIN: Money = Money(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, true, 2));

    /// create from decimal, rounding half away from zero
    ///
    /// Values beyond [`Money::MAX`] / [`Money::MIN`] saturate.
    pub fn from_decimal(d: Decimal) -> Self {
        Money::checked_from_decimal(d).unwrap_or(if d.is_sign_negative() {
            Money::MIN
        } else {
            Money::MAX
        })
    }

    /// create from decimal, `None` when it is too large to keep two decimals
    pub fn checked_from_decimal(d: Decimal) -> Option<Self> {
        let mut rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded.rescale(2);
        (rounded.scale() == 2).then_some(Money(rounded))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).and_then(Money::checked_from_decimal)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).and_then(Money::checked_from_decimal)
    }

    /// create from integer amount (pounds, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money::from_decimal(Decimal::from(amount))
    }

    /// parse plain or scientific notation, surrounding whitespace ignored
    ///
    /// Amounts too large to keep two decimals are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
            .and_then(Money::checked_from_decimal)
    }

    /// parse, treating anything non-numeric as zero
    pub fn parse_lossy(s: &str) -> Self {
        Money::parse(s).unwrap_or(Money::ZERO)
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let d = Decimal::from_str(s.trim())?;
        Money::checked_from_decimal(d).ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

/// saturates at [`Money::MAX`] / [`Money::MIN`]
impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_decimal(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_decimal(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

/// canonical two-decimal text for a numeric string, "0.00" if it is not one
///
/// The whole trimmed string must be a number: `"12abc"` gives "0.00", not "12.00".
pub fn normalize_amount_str(s: &str) -> String {
    Money::parse_lossy(s).to_string()
}

/// canonical two-decimal text for a json number or numeric string
///
/// Never fails: null, booleans, objects and unparseable strings all map to "0.00".
pub fn normalize_amount(value: &Value) -> String {
    match value {
        Value::String(s) => normalize_amount_str(s),
        Value::Number(n) => normalize_amount_str(&n.to_string()),
        _ => ZERO_AMOUNT.to_string(),
    }
}

/// rewrite every field keyed `amount`, at any depth, into two-decimal text
///
/// Sibling keys (`amount_2`, `total`, ...) and the overall shape are left alone.
/// Values under an `amount` key are replaced wholesale, even if they are objects.
pub fn normalize_amounts_deep(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| {
                    let v = if key == AMOUNT_KEY {
                        Value::String(normalize_amount(&v))
                    } else {
                        normalize_amounts_deep(v)
                    };
                    (key, v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_amounts_deep).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_money_two_decimal_display() {
        assert_eq!(Money::from_major(750).to_string(), "750.00");
        assert_eq!(Money::from_decimal(dec!(12.5)).to_string(), "12.50");
        assert_eq!(Money::from_decimal(dec!(0.1234)).to_string(), "0.12");
    }

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(normalize_amount_str("1.005"), "1.01");
        assert_eq!(normalize_amount_str("2.345"), "2.35");
        assert_eq!(normalize_amount_str("-2.345"), "-2.35");
        assert_eq!(normalize_amount_str("2.344"), "2.34");
    }

    #[test]
    fn test_negative_zero_prints_plain() {
        assert_eq!(normalize_amount_str("-0.001"), "0.00");
        assert_eq!(normalize_amount_str("-0"), "0.00");
    }

    #[test]
    fn test_non_numeric_is_zero() {
        assert_eq!(normalize_amount_str("not-a-number"), "0.00");
        assert_eq!(normalize_amount_str(""), "0.00");
        assert_eq!(normalize_amount_str("   "), "0.00");
        assert_eq!(normalize_amount(&Value::Null), "0.00");
        assert_eq!(normalize_amount(&json!(true)), "0.00");
        assert_eq!(normalize_amount(&json!({"v": 1})), "0.00");
    }

    #[test]
    fn test_numbers_and_strings() {
        assert_eq!(normalize_amount(&json!(750)), "750.00");
        assert_eq!(normalize_amount(&json!(650.5)), "650.50");
        assert_eq!(normalize_amount(&json!(" 99.999 ")), "100.00");
        assert_eq!(normalize_amount(&json!("1e3")), "1000.00");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["750", "0.005", "-12.345", "1e2", "650.50", "3.14159", "100000.999"] {
            let once = normalize_amount_str(raw);
            assert_eq!(normalize_amount_str(&once), once, "input {raw}");
        }
    }

    #[test]
    fn test_deep_only_touches_amount_keys() {
        let input = json!({
            "amount": 750,
            "amount_2": 750,
            "total": "12.3",
            "tenant": [
                {"amount": "650.5", "city": "Leeds"},
                {"nested": {"amount": null, "amount_due": 1}}
            ],
            "tags": ["amount", 5]
        });

        let out = normalize_amounts_deep(input);

        assert_eq!(out["amount"], json!("750.00"));
        assert_eq!(out["amount_2"], json!(750));
        assert_eq!(out["total"], json!("12.3"));
        assert_eq!(out["tenant"][0]["amount"], json!("650.50"));
        assert_eq!(out["tenant"][0]["city"], json!("Leeds"));
        assert_eq!(out["tenant"][1]["nested"]["amount"], json!("0.00"));
        assert_eq!(out["tenant"][1]["nested"]["amount_due"], json!(1));
        assert_eq!(out["tags"], json!(["amount", 5]));
    }

    #[test]
    fn test_deep_leaves_scalars_alone() {
        assert_eq!(normalize_amounts_deep(json!(12.3456)), json!(12.3456));
        assert_eq!(normalize_amounts_deep(json!("amount")), json!("amount"));
    }

    #[test]
    fn test_money_sum() {
        let total: Money = ["650.00", "650.50", "0.25"]
            .iter()
            .map(|s| Money::parse_lossy(s))
            .sum();
        assert_eq!(total.to_string(), "1300.75");
        assert_eq!((total - Money::from_major(1300)).to_string(), "0.75");
    }

    #[test]
    fn test_numeric_prefix_is_not_numeric() {
        assert_eq!(normalize_amount_str("12abc"), "0.00");
        assert_eq!(normalize_amount_str("12 50"), "0.00");
    }

    #[test]
    fn test_huge_amounts_keep_two_decimals() {
        assert_eq!(
            normalize_amount_str("1e26"),
            "100000000000000000000000000.00"
        );
        assert_eq!(normalize_amount_str("1e27"), "0.00");
        assert_eq!(normalize_amount_str("50000000000000000000000000000"), "0.00");
        assert!(Money::parse("-1e27").is_none());
        assert!("1e27".parse::<Money>().is_err());

        assert_eq!(Money::MAX.as_decimal().scale(), 2);
        assert_eq!(Money::from_decimal(Decimal::MAX), Money::MAX);
        assert_eq!(Money::from_decimal(Decimal::MIN), Money::MIN);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::parse("500000000000000000000000000").unwrap();
        assert_eq!(big.to_string(), "500000000000000000000000000.00");

        assert!(big.checked_add(big).is_none());
        assert_eq!(big + big, Money::MAX);
        assert_eq!(Money::MIN - big, Money::MIN);
        assert!(Money::MIN.checked_sub(big).is_none());
        assert_eq!(big.checked_sub(big), Some(Money::ZERO));

        let total: Money = std::iter::repeat(big).take(3).sum();
        assert_eq!(total, Money::MAX);
    }
}
