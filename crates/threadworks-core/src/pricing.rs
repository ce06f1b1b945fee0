//! Markup and quantity price-break math (spec §4.F.8, §8 scenario S6).
//!
//! Pure functions only — no SQL, no HTTP. The DB layer supplies the raw
//! `base_price` / override rows; this module turns them into the
//! `sell_price` / `price_breaks` shape the listing and detail endpoints
//! return.

use rust_decimal::Decimal;

use crate::types::{MarkupSource, PriceBreak};

/// One row of the global quantity price-break schedule: `[min, max]` with a
/// percentage discount off the tier-1 unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakTier {
    pub min: u32,
    pub max: Option<u32>,
    pub discount_percent: u32,
}

/// The global default schedule (spec §4.F.8): `1-9:0%, 10-24:8%, 25-49:10%,
/// 50-99:15%, 100-249:25%, 250+:30%`.
pub const DEFAULT_PRICE_BREAKS: &[PriceBreakTier] = &[
    PriceBreakTier { min: 1, max: Some(9), discount_percent: 0 },
    PriceBreakTier { min: 10, max: Some(24), discount_percent: 8 },
    PriceBreakTier { min: 25, max: Some(49), discount_percent: 10 },
    PriceBreakTier { min: 50, max: Some(99), discount_percent: 15 },
    PriceBreakTier { min: 100, max: Some(249), discount_percent: 25 },
    PriceBreakTier { min: 250, max: None, discount_percent: 30 },
];

/// Derive the markup tier and its source (spec §9 Open Question 3).
///
/// `override_markup` takes precedence when present; otherwise the markup is
/// computed from `sell_price / base_price - 1` against the global prices.
#[must_use]
pub fn derive_markup(
    base_price: Decimal,
    sell_price: Decimal,
    override_markup: Option<Decimal>,
) -> (Decimal, MarkupSource) {
    if let Some(markup) = override_markup {
        return (markup, MarkupSource::Override);
    }
    if base_price.is_zero() {
        return (Decimal::ZERO, MarkupSource::Global);
    }
    (sell_price / base_price - Decimal::ONE, MarkupSource::Global)
}

/// Build the `priceBreaks` array for a product from a schedule and its
/// tier-1 unit price.
///
/// The schedule may be the global default or a per-product override; either
/// way the discount is applied off `unit_price` (the price already shown at
/// quantity 1, i.e. post-markup).
#[must_use]
pub fn build_price_breaks(unit_price: Decimal, schedule: &[PriceBreakTier]) -> Vec<PriceBreak> {
    schedule
        .iter()
        .map(|tier| {
            let percentage = Decimal::from(tier.discount_percent);
            let factor = Decimal::ONE - percentage / Decimal::from(100);
            PriceBreak {
                min: tier.min,
                max: tier.max,
                price: (unit_price * factor).round_dp(2),
                percentage,
            }
        })
        .collect()
}

/// Find which tier a given order quantity falls into, if any.
#[must_use]
pub fn tier_for_quantity(schedule: &[PriceBreakTier], quantity: u32) -> Option<&PriceBreakTier> {
    schedule
        .iter()
        .find(|t| quantity >= t.min && t.max.map_or(true, |max| quantity <= max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_covers_one_to_infinity_with_no_gaps() {
        for window in DEFAULT_PRICE_BREAKS.windows(2) {
            let (a, b) = (window[0], window[1]);
            assert_eq!(a.max.unwrap() + 1, b.min, "gap between {a:?} and {b:?}");
        }
        assert!(DEFAULT_PRICE_BREAKS.first().unwrap().min == 1);
        assert!(DEFAULT_PRICE_BREAKS.last().unwrap().max.is_none());
    }

    #[test]
    fn tier_for_quantity_finds_correct_bucket() {
        assert_eq!(tier_for_quantity(DEFAULT_PRICE_BREAKS, 1).unwrap().min, 1);
        assert_eq!(tier_for_quantity(DEFAULT_PRICE_BREAKS, 9).unwrap().min, 1);
        assert_eq!(tier_for_quantity(DEFAULT_PRICE_BREAKS, 10).unwrap().min, 10);
        assert_eq!(tier_for_quantity(DEFAULT_PRICE_BREAKS, 300).unwrap().min, 250);
    }

    #[test]
    fn build_price_breaks_is_monotonically_non_increasing() {
        let breaks = build_price_breaks(Decimal::new(1000, 2), DEFAULT_PRICE_BREAKS);
        for window in breaks.windows(2) {
            assert!(
                window[1].price <= window[0].price,
                "price increased from tier {:?} to {:?}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn build_price_breaks_tier_one_equals_unit_price() {
        let breaks = build_price_breaks(Decimal::new(1250, 2), DEFAULT_PRICE_BREAKS);
        assert_eq!(breaks[0].price, Decimal::new(1250, 2));
        assert_eq!(breaks[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn derive_markup_prefers_override() {
        let (markup, source) = derive_markup(
            Decimal::new(1000, 2),
            Decimal::new(1500, 2),
            Some(Decimal::new(40, 2)),
        );
        assert_eq!(markup, Decimal::new(40, 2));
        assert_eq!(source, MarkupSource::Override);
    }

    #[test]
    fn derive_markup_computes_from_prices_when_no_override() {
        let (markup, source) =
            derive_markup(Decimal::new(1000, 2), Decimal::new(1500, 2), None);
        assert_eq!(markup, Decimal::new(5, 1));
        assert_eq!(source, MarkupSource::Global);
    }

    #[test]
    fn derive_markup_handles_zero_base_price() {
        let (markup, source) = derive_markup(Decimal::ZERO, Decimal::new(1500, 2), None);
        assert_eq!(markup, Decimal::ZERO);
        assert_eq!(source, MarkupSource::Global);
    }

    #[test]
    fn derive_markup_round_trips_sell_price() {
        let base = Decimal::new(2000, 2);
        let (markup, _) = derive_markup(base, Decimal::new(2500, 2), None);
        let reconstructed = base * (Decimal::ONE + markup);
        assert_eq!(reconstructed, Decimal::new(2500, 2));
    }
}
