//! Five-component weighted bankruptcy-risk index.
//!
//! Index = 1.2*A + 1.4*B + 3.3*C + 0.6*D + 1.0*E over the most recent
//! period, with market value of equity taken from the latest
//! enterprise-value record:
//!
//! - A: working capital / total assets
//! - B: retained earnings / total assets
//! - C: EBIT proxy (operating income + interest expense) / total assets
//! - D: market capitalization / total liabilities
//! - E: revenue / total assets
//!
//! Zones: above 2.99 safe, from 1.81 grey, below that distress. Zero
//! denominators substitute 1, so a company with no reported liabilities
//! still yields D = 0.6 * market cap rather than a division failure.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinHealthError;
use crate::market;
use crate::statements::PeriodRecord;
use crate::types::{Money, SourceRecord};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Weights and thresholds
// ---------------------------------------------------------------------------

const WEIGHT_A: Decimal = dec!(1.2);
const WEIGHT_B: Decimal = dec!(1.4);
const WEIGHT_C: Decimal = dec!(3.3);
const WEIGHT_D: Decimal = dec!(0.6);
const WEIGHT_E: Decimal = dec!(1.0);

const SAFE_ABOVE: Decimal = dec!(2.99);
const GREY_FROM: Decimal = dec!(1.81);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Risk classification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskZone {
    #[serde(rename = "safe zone")]
    Safe,
    #[serde(rename = "grey zone")]
    Grey,
    #[serde(rename = "distress zone")]
    Distress,
}

impl std::fmt::Display for RiskZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "safe zone"),
            Self::Grey => write!(f, "grey zone"),
            Self::Distress => write!(f, "distress zone"),
        }
    }
}

/// One weighted component with its traceable inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub name: String,
    pub ratio: Decimal,
    pub weight: Decimal,
    pub weighted_value: Decimal,
}

/// Raw figures behind the five ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFigures {
    pub working_capital: Money,
    pub total_assets: Money,
    pub retained_earnings: Money,
    /// Operating income plus interest expense, sign taken as-is.
    pub ebit: Money,
    pub market_cap: Money,
    pub total_liabilities: Money,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndexOutput {
    pub index: Decimal,
    pub classification: RiskZone,
    /// Components A through E, in order.
    pub components: Vec<RiskComponent>,
    pub figures: RiskFigures,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    let denominator = if denominator.is_zero() {
        Decimal::ONE
    } else {
        denominator
    };
    numerator / denominator
}

fn classify(index: Decimal) -> RiskZone {
    if index > SAFE_ABOVE {
        RiskZone::Safe
    } else if index >= GREY_FROM {
        RiskZone::Grey
    } else {
        RiskZone::Distress
    }
}

fn build_component(name: &str, ratio: Decimal, weight: Decimal) -> RiskComponent {
    RiskComponent {
        name: name.to_string(),
        ratio,
        weight,
        weighted_value: weight * ratio,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the weighted risk index for the most recent period.
pub fn calculate_risk_index(
    periods: &[PeriodRecord],
    enterprise_values: &[SourceRecord],
) -> FinHealthResult<RiskIndexOutput> {
    let Some(current) = periods.first() else {
        return Err(FinHealthError::InsufficientData(
            "risk index requires at least 1 period".to_string(),
        ));
    };

    let market_cap = market::latest_market_cap(enterprise_values);
    let working_capital = current.current_assets - current.current_liabilities;
    let ebit = current.operating_income + current.interest_expense;

    let a = build_component(
        "A: working capital / total assets",
        ratio(working_capital, current.total_assets),
        WEIGHT_A,
    );
    let b = build_component(
        "B: retained earnings / total assets",
        ratio(current.retained_earnings, current.total_assets),
        WEIGHT_B,
    );
    let c = build_component(
        "C: EBIT / total assets",
        ratio(ebit, current.total_assets),
        WEIGHT_C,
    );
    let d = build_component(
        "D: market capitalization / total liabilities",
        ratio(market_cap, current.total_liabilities),
        WEIGHT_D,
    );
    let e = build_component(
        "E: revenue / total assets",
        ratio(current.revenue, current.total_assets),
        WEIGHT_E,
    );

    let index = a.weighted_value
        + b.weighted_value
        + c.weighted_value
        + d.weighted_value
        + e.weighted_value;

    Ok(RiskIndexOutput {
        index,
        classification: classify(index),
        components: vec![a, b, c, d, e],
        figures: RiskFigures {
            working_capital,
            total_assets: current.total_assets,
            retained_earnings: current.retained_earnings,
            ebit,
            market_cap,
            total_liabilities: current.total_liabilities,
            revenue: current.revenue,
        },
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::CriticalPresence;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn market_source(cap: i64) -> Vec<SourceRecord> {
        vec![json!({"marketCapitalization": cap})
            .as_object()
            .cloned()
            .unwrap()]
    }

    fn blank_period(date: &str) -> PeriodRecord {
        PeriodRecord {
            date: date.parse().unwrap(),
            symbol: "ACME".to_string(),
            period: "FY".to_string(),
            revenue: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            operating_income: Decimal::ZERO,
            net_income: Decimal::ZERO,
            interest_expense: Decimal::ZERO,
            pre_tax_income: Decimal::ZERO,
            weighted_average_shares: Decimal::ZERO,
            total_assets: Decimal::ZERO,
            total_liabilities: Decimal::ZERO,
            stockholders_equity: Decimal::ZERO,
            current_assets: Decimal::ZERO,
            current_liabilities: Decimal::ZERO,
            retained_earnings: Decimal::ZERO,
            long_term_debt: Decimal::ZERO,
            operating_cash_flow: Decimal::ZERO,
            investing_cash_flow: Decimal::ZERO,
            financing_cash_flow: Decimal::ZERO,
            capital_expenditure: Decimal::ZERO,
            present: CriticalPresence {
                net_income: true,
                total_assets: true,
                revenue: true,
                stockholders_equity: true,
            },
        }
    }

    fn healthy_period() -> PeriodRecord {
        let mut p = blank_period("2024-12-31");
        p.revenue = dec!(1_500_000);
        p.operating_income = dec!(90_000);
        p.interest_expense = dec!(10_000);
        p.total_assets = dec!(1_000_000);
        p.total_liabilities = dec!(500_000);
        p.current_assets = dec!(350_000);
        p.current_liabilities = dec!(150_000);
        p.retained_earnings = dec!(300_000);
        p
    }

    #[test]
    fn test_empty_periods_error() {
        let err = calculate_risk_index(&[], &market_source(1)).unwrap_err();
        assert!(matches!(err, FinHealthError::InsufficientData(_)));
    }

    #[test]
    fn test_component_arithmetic() {
        let p = healthy_period();
        let out = calculate_risk_index(&[p], &market_source(1_000_000)).unwrap();

        // A = (350k - 150k) / 1M = 0.2 -> 0.24
        assert_eq!(out.components[0].ratio, dec!(0.2));
        assert_eq!(out.components[0].weight, dec!(1.2));
        assert_eq!(out.components[0].weighted_value, dec!(0.24));
        // B = 300k / 1M = 0.3 -> 0.42
        assert_eq!(out.components[1].ratio, dec!(0.3));
        assert_eq!(out.components[1].weighted_value, dec!(0.42));
        // C = (90k + 10k) / 1M = 0.1 -> 0.33
        assert_eq!(out.components[2].ratio, dec!(0.1));
        assert_eq!(out.components[2].weighted_value, dec!(0.33));
        // D = 1M / 500k = 2.0 -> 1.2
        assert_eq!(out.components[3].ratio, dec!(2));
        assert_eq!(out.components[3].weighted_value, dec!(1.2));
        // E = 1.5M / 1M = 1.5 -> 1.5
        assert_eq!(out.components[4].ratio, dec!(1.5));
        assert_eq!(out.components[4].weighted_value, dec!(1.5));

        // Index = 0.24 + 0.42 + 0.33 + 1.2 + 1.5 = 3.69 -> safe
        assert_eq!(out.index, dec!(3.69));
        assert_eq!(out.classification, RiskZone::Safe);
    }

    #[test]
    fn test_figures_retained() {
        let p = healthy_period();
        let out = calculate_risk_index(&[p], &market_source(1_000_000)).unwrap();
        assert_eq!(out.figures.working_capital, dec!(200_000));
        assert_eq!(out.figures.total_assets, dec!(1_000_000));
        assert_eq!(out.figures.retained_earnings, dec!(300_000));
        assert_eq!(out.figures.ebit, dec!(100_000));
        assert_eq!(out.figures.market_cap, dec!(1_000_000));
        assert_eq!(out.figures.total_liabilities, dec!(500_000));
        assert_eq!(out.figures.revenue, dec!(1_500_000));
    }

    #[test]
    fn test_interest_expense_sign_taken_as_is() {
        let mut p = healthy_period();
        p.operating_income = dec!(100_000);
        p.interest_expense = dec!(-30_000);
        let out = calculate_risk_index(&[p], &market_source(0)).unwrap();
        assert_eq!(out.figures.ebit, dec!(70_000));
    }

    #[test]
    fn test_boundary_exactly_safe_threshold_is_grey() {
        // Everything zero except revenue / assets: index = E = 2.99.
        let mut p = blank_period("2024-12-31");
        p.total_assets = dec!(100);
        p.revenue = dec!(299);
        let out = calculate_risk_index(&[p], &[]).unwrap();
        assert_eq!(out.index, dec!(2.99));
        assert_eq!(out.classification, RiskZone::Grey);
    }

    #[test]
    fn test_boundary_exactly_grey_threshold_is_grey() {
        let mut p = blank_period("2024-12-31");
        p.total_assets = dec!(100);
        p.revenue = dec!(181);
        let out = calculate_risk_index(&[p], &[]).unwrap();
        assert_eq!(out.index, dec!(1.81));
        assert_eq!(out.classification, RiskZone::Grey);
    }

    #[test]
    fn test_above_safe_threshold() {
        let mut p = blank_period("2024-12-31");
        p.total_assets = dec!(100);
        p.revenue = dec!(300);
        let out = calculate_risk_index(&[p], &[]).unwrap();
        assert_eq!(out.classification, RiskZone::Safe);
    }

    #[test]
    fn test_below_grey_threshold_is_distress() {
        let mut p = blank_period("2024-12-31");
        p.total_assets = dec!(100);
        p.revenue = dec!(180);
        let out = calculate_risk_index(&[p], &[]).unwrap();
        assert_eq!(out.classification, RiskZone::Distress);
    }

    #[test]
    fn test_zero_liabilities_substitutes_denominator() {
        let mut p = blank_period("2024-12-31");
        p.total_assets = dec!(100);
        let out = calculate_risk_index(&[p], &market_source(50)).unwrap();
        // D = 0.6 * 50 / 1 = 30, not a division failure.
        assert_eq!(out.components[3].ratio, dec!(50));
        assert_eq!(out.components[3].weighted_value, dec!(30));
    }

    #[test]
    fn test_missing_market_source_defaults_to_zero() {
        let p = healthy_period();
        let out = calculate_risk_index(&[p], &[]).unwrap();
        assert_eq!(out.figures.market_cap, Decimal::ZERO);
        assert_eq!(out.components[3].weighted_value, Decimal::ZERO);
    }

    #[test]
    fn test_only_most_recent_period_used() {
        let current = healthy_period();
        let mut stale = blank_period("2023-12-31");
        stale.total_assets = dec!(1);
        let out = calculate_risk_index(&[current, stale], &market_source(1_000_000)).unwrap();
        assert_eq!(out.figures.total_assets, dec!(1_000_000));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let out = calculate_risk_index(&[healthy_period()], &market_source(1_000_000)).unwrap();
        let json = serde_json::to_string(&out).unwrap();
        let deser: RiskIndexOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(out, deser);
    }
}
