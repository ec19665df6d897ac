//! Auxiliary market-data lookups over raw provider records.

use rust_decimal::Decimal;

use crate::types::{decimal_from_value, SourceRecord};

/// PE-ratio candidates tried against the company profile record, in order.
const PROFILE_PE_FIELDS: [&str; 5] = [
    "pe",
    "peRatio",
    "pe_ratio",
    "peRatioTTM",
    "priceEarningsRatio",
];

/// PE-ratio candidates tried against the latest key-metrics record.
const KEY_METRICS_PE_FIELDS: [&str; 4] = [
    "peRatioTTM",
    "pe_ratio",
    "peRatio",
    "priceEarningsRatio",
];

/// Market capitalization from the latest (first) enterprise-value record,
/// defaulting to 0 when the collection is empty or the field is absent.
pub fn latest_market_cap(enterprise_values: &[SourceRecord]) -> Decimal {
    enterprise_values
        .first()
        .and_then(|rec| rec.get("marketCapitalization"))
        .and_then(decimal_from_value)
        .unwrap_or(Decimal::ZERO)
}

/// Price-earnings ratio via an ordered candidate search: the profile
/// record first, then the latest key-metrics record. `None` is the
/// "not available" sentinel when no candidate carries a numeric value.
pub fn lookup_pe_ratio(
    profile: Option<&SourceRecord>,
    key_metrics: &[SourceRecord],
) -> Option<Decimal> {
    if let Some(pe) = profile.and_then(|rec| first_numeric(rec, &PROFILE_PE_FIELDS)) {
        return Some(pe);
    }
    key_metrics
        .first()
        .and_then(|rec| first_numeric(rec, &KEY_METRICS_PE_FIELDS))
}

fn first_numeric(rec: &SourceRecord, fields: &[&str]) -> Option<Decimal> {
    fields
        .iter()
        .find_map(|field| rec.get(*field).and_then(decimal_from_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn rec(value: serde_json::Value) -> SourceRecord {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn test_market_cap_from_latest_entry() {
        let values = vec![
            rec(json!({"marketCapitalization": 5_000_000})),
            rec(json!({"marketCapitalization": 4_000_000})),
        ];
        assert_eq!(latest_market_cap(&values), dec!(5_000_000));
    }

    #[test]
    fn test_market_cap_defaults_to_zero() {
        assert_eq!(latest_market_cap(&[]), Decimal::ZERO);
        assert_eq!(latest_market_cap(&[rec(json!({}))]), Decimal::ZERO);
        assert_eq!(
            latest_market_cap(&[rec(json!({"marketCapitalization": null}))]),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_pe_from_profile_first_candidate() {
        let profile = rec(json!({"pe": 21.5, "peRatioTTM": 30}));
        assert_eq!(lookup_pe_ratio(Some(&profile), &[]), Some(dec!(21.5)));
    }

    #[test]
    fn test_pe_profile_candidate_order() {
        let profile = rec(json!({"priceEarningsRatio": 18, "peRatio": 19}));
        assert_eq!(lookup_pe_ratio(Some(&profile), &[]), Some(dec!(19)));
    }

    #[test]
    fn test_pe_falls_back_to_key_metrics() {
        let profile = rec(json!({"companyName": "ACME"}));
        let metrics = vec![rec(json!({"peRatioTTM": 24.1}))];
        assert_eq!(lookup_pe_ratio(Some(&profile), &metrics), Some(dec!(24.1)));
    }

    #[test]
    fn test_pe_null_candidate_skipped() {
        let profile = rec(json!({"pe": null, "peRatio": 17}));
        assert_eq!(lookup_pe_ratio(Some(&profile), &[]), Some(dec!(17)));
    }

    #[test]
    fn test_pe_not_available() {
        assert_eq!(lookup_pe_ratio(None, &[]), None);
        let profile = rec(json!({"sector": "Tech"}));
        assert_eq!(lookup_pe_ratio(Some(&profile), &[rec(json!({}))]), None);
    }
}
