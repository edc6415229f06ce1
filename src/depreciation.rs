// 🏭 Depreciation - Straight-line monthly charge across fixed assets
//
// Every asset bought on or before `as_of` contributes cost × rate per
// year. There is no useful-life cutoff: once in service an asset keeps
// depreciating indefinitely.

use crate::models::FixedAsset;
use chrono::NaiveDate;

/// Sum of annual depreciation over in-service assets
pub fn annual_depreciation(assets: &[FixedAsset], as_of: NaiveDate) -> f64 {
    assets
        .iter()
        .filter(|asset| asset.purchase_date <= as_of)
        .fold(0.0, |acc, asset| acc + asset.cost * asset.depreciation_rate)
}

/// Flat recurring monthly depreciation charge
pub fn monthly_depreciation(assets: &[FixedAsset], as_of: NaiveDate) -> f64 {
    annual_depreciation(assets, as_of) / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(cost: f64, rate: f64, y: i32, m: u32, d: u32) -> FixedAsset {
        FixedAsset {
            name: None,
            cost,
            purchase_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            depreciation_rate: rate,
        }
    }

    #[test]
    fn test_monthly_depreciation() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let assets = vec![asset(12_000.0, 0.2, 2024, 1, 1), asset(6_000.0, 0.1, 2025, 1, 1)];

        // (2400 + 600) / 12 = 250
        assert_eq!(monthly_depreciation(&assets, as_of), 250.0);
    }

    #[test]
    fn test_same_day_purchase_is_charged() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let assets = vec![asset(12_000.0, 0.2, 2025, 6, 1), asset(1_200.0, 0.1, 2026, 1, 1)];

        // Only the same-day purchase counts: 2400 / 12
        assert_eq!(monthly_depreciation(&assets, as_of), 200.0);
    }

    #[test]
    fn test_future_purchase_excluded() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let assets = vec![asset(1_200.0, 0.1, 2025, 6, 2)];

        let monthly = monthly_depreciation(&assets, as_of);
        assert_eq!(monthly, 0.0);
        assert!(monthly.is_sign_positive());
        assert!(monthly_depreciation(&[], as_of).is_sign_positive());
    }

    #[test]
    fn test_no_useful_life_cutoff() {
        // A 1990 asset at 50%/year is still charged in 2025
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let assets = vec![asset(2_400.0, 0.5, 1990, 1, 1)];
        assert_eq!(monthly_depreciation(&assets, as_of), 100.0);
    }
}
