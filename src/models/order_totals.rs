use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Largest difference between a stored and a recomputed amount that is
/// still considered consistent.
pub const DRIFT_TOLERANCE: Decimal = dec!(0.01);

/// Largest amount a `decimal(12, 2)` money column can hold.
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

/// Rounds a money amount to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `true` when the amount fits a money column once rounded.
pub fn within_limit(value: Decimal) -> bool {
    round_money(value).abs() <= MAX_AMOUNT
}

/// `quantity × unit_price` rounded to cents, or `None` on overflow.
pub fn line_total(quantity: i32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price).map(round_money)
}

pub fn default_tax(subtotal: Decimal, rate: Decimal) -> Option<Decimal> {
    subtotal.checked_mul(rate).map(round_money)
}

/// `true` when `stored` differs from `expected` by more than a cent.
pub fn has_drift(stored: Decimal, expected: Decimal) -> bool {
    match stored.checked_sub(expected) {
        Some(diff) => diff.abs() > DRIFT_TOLERANCE,
        None => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Builds totals from `(quantity, unit_price)` pairs. Line totals are
    /// rounded individually before being summed. `None` on overflow.
    pub fn from_lines<I>(lines: I, tax: Decimal, shipping: Decimal) -> Option<Self>
    where
        I: IntoIterator<Item = (i32, Decimal)>,
    {
        let subtotal = lines.into_iter().try_fold(Decimal::ZERO, |acc, (qty, price)| {
            acc.checked_add(line_total(qty, price)?)
        })?;
        Self::from_subtotal(subtotal, tax, shipping)
    }

    pub fn from_subtotal(subtotal: Decimal, tax: Decimal, shipping: Decimal) -> Option<Self> {
        let subtotal = round_money(subtotal);
        let tax = round_money(tax);
        let shipping = round_money(shipping);
        Some(Self {
            subtotal,
            tax,
            shipping,
            total: subtotal.checked_add(tax)?.checked_add(shipping)?,
        })
    }

    /// `true` when every amount fits a money column.
    pub fn within_limit(&self) -> bool {
        [self.subtotal, self.tax, self.shipping, self.total]
            .into_iter()
            .all(within_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3, dec!(2.50), dec!(7.50))]
    #[case(100, dec!(1.255), dec!(125.50))]
    #[case(1, dec!(0.005), dec!(0.01))]
    #[case(0, dec!(9.99), dec!(0.00))]
    fn line_total_rounds_to_cents(
        #[case] qty: i32,
        #[case] price: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(line_total(qty, price), Some(expected));
    }

    #[test]
    fn line_total_reports_overflow() {
        assert_eq!(line_total(i32::MAX, Decimal::MAX), None);
        let huge = Decimal::from_str("79228162514264337593543950").unwrap();
        assert_eq!(line_total(2_000_000_000, huge), None);
    }

    #[test]
    fn totals_add_tax_and_shipping() {
        let totals = OrderTotals::from_lines(
            vec![(10, dec!(4.25)), (2, dec!(12.00))],
            dec!(5.00),
            dec!(15.00),
        )
        .unwrap();
        assert_eq!(totals.subtotal, dec!(66.50));
        assert_eq!(totals.total, dec!(86.50));
        assert!(totals.within_limit());
    }

    #[test]
    fn totals_past_the_column_limit_are_flagged() {
        let totals = OrderTotals::from_subtotal(MAX_AMOUNT, dec!(0.01), Decimal::ZERO).unwrap();
        assert!(!totals.within_limit());
        assert!(OrderTotals::from_subtotal(Decimal::MAX, Decimal::MAX, Decimal::ZERO).is_none());
        assert!(within_limit(MAX_AMOUNT));
    }

    #[test]
    fn drift_must_exceed_one_cent() {
        assert!(!has_drift(dec!(10.00), dec!(10.01)));
        assert!(has_drift(dec!(10.00), dec!(10.02)));
        assert!(has_drift(dec!(10.02), dec!(10.00)));
    }

    #[test]
    fn default_tax_applies_rate() {
        assert_eq!(default_tax(dec!(200.00), dec!(0.0825)), Some(dec!(16.50)));
        assert_eq!(default_tax(dec!(200.00), Decimal::ZERO), Some(Decimal::ZERO));
    }
}
