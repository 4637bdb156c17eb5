//! Listing charge calculators. Pure functions, no ledger access; the route
//! layer books the resulting charge through the ledger when a listing is
//! actually created. All values are NAD cents.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Flat add-on per selected boost feature (N$100).
pub const FEATURE_FEE_CENTS: i64 = 100_00;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct FeatureSelections {
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub priority_search: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingChargeQuoteRequest {
    /// Declared value of the listed item, NAD cents.
    pub value: i64,
    #[serde(default)]
    pub features: FeatureSelections,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingCharge {
    pub listing_fee: i64,
    pub feature_fee: i64,
    pub total: i64,
}

/// Tiered flat fee by declared item value. Boundaries are inclusive on the
/// lower bound of each tier.
pub fn listing_fee(value_cents: i64) -> i64 {
    if value_cents >= 100_000_00 {
        100_00
    } else if value_cents >= 40_000_00 {
        30_00
    } else if value_cents >= 20_000_00 {
        15_00
    } else {
        5_00
    }
}

/// Each selected flag adds the flat rate independently; no bundling discount.
pub fn feature_fee(selections: &FeatureSelections) -> i64 {
    [
        selections.featured,
        selections.highlighted,
        selections.priority_search,
    ]
    .iter()
    .filter(|&&selected| selected)
    .count() as i64
        * FEATURE_FEE_CENTS
}

pub fn total_listing_charge(value_cents: i64, selections: &FeatureSelections) -> ListingCharge {
    let listing_fee = listing_fee(value_cents);
    let feature_fee = feature_fee(selections);
    ListingCharge {
        listing_fee,
        feature_fee,
        total: listing_fee + feature_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_fee_tiers() {
        assert_eq!(listing_fee(19_999_00), 5_00);
        assert_eq!(listing_fee(20_000_00), 15_00);
        assert_eq!(listing_fee(39_999_00), 15_00);
        assert_eq!(listing_fee(40_000_00), 30_00);
        assert_eq!(listing_fee(99_999_00), 30_00);
        assert_eq!(listing_fee(100_000_00), 100_00);
    }

    #[test]
    fn test_listing_fee_is_monotonic() {
        let mut last = 0;
        for value in [0, 19_999_00, 20_000_00, 39_999_00, 40_000_00, 100_000_00] {
            let fee = listing_fee(value);
            assert!(fee >= last);
            last = fee;
        }
    }

    #[test]
    fn test_feature_fee_is_additive() {
        let none = FeatureSelections::default();
        assert_eq!(feature_fee(&none), 0);

        let two = FeatureSelections {
            featured: true,
            highlighted: true,
            priority_search: false,
        };
        assert_eq!(feature_fee(&two), 200_00);

        let all = FeatureSelections {
            featured: true,
            highlighted: true,
            priority_search: true,
        };
        assert_eq!(feature_fee(&all), 300_00);
    }

    #[test]
    fn test_total_listing_charge_sums_both() {
        let charge = total_listing_charge(
            25_000_00,
            &FeatureSelections {
                featured: true,
                highlighted: false,
                priority_search: false,
            },
        );
        assert_eq!(charge.listing_fee, 15_00);
        assert_eq!(charge.feature_fee, 100_00);
        assert_eq!(charge.total, 115_00);
    }
}
