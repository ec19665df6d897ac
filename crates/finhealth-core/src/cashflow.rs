//! Cash-flow quality analysis for the most recent period.
//!
//! Quality ratio = operating cash flow / net income, left at 0 when net
//! income is 0 (this model deliberately does not substitute the
//! denominator the way the score models do). Free cash flow subtracts the
//! absolute capital expenditure regardless of its reported sign.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinHealthError;
use crate::statements::PeriodRecord;
use crate::types::{Money, Rate};
use crate::FinHealthResult;

const EXCELLENT_FROM: Decimal = dec!(1.2);
const GOOD_FROM: Decimal = dec!(1.0);
const FAIR_FROM: Decimal = dec!(0.8);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Qualitative tier on the quality ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowTier {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
    #[serde(rename = "needs attention")]
    NeedsAttention,
}

impl std::fmt::Display for CashFlowTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::NeedsAttention => write!(f, "needs attention"),
        }
    }
}

/// Shares of each flow in the total of all three, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowMix {
    pub operating_pct: Decimal,
    pub investing_pct: Decimal,
    pub financing_pct: Decimal,
}

/// Raw flows the analysis was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowFigures {
    pub operating_cash_flow: Money,
    pub investing_cash_flow: Money,
    pub financing_cash_flow: Money,
    pub net_income: Money,
    pub capital_expenditure: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowOutput {
    /// Operating cash flow over net income; 0 when net income is 0.
    pub quality_ratio: Rate,
    /// Operating cash flow minus the absolute capital expenditure.
    pub free_cash_flow: Money,
    pub assessment: CashFlowTier,
    pub mix: CashFlowMix,
    pub figures: CashFlowFigures,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze cash-flow quality for the most recent period.
pub fn calculate_cash_flow_quality(periods: &[PeriodRecord]) -> FinHealthResult<CashFlowOutput> {
    let Some(current) = periods.first() else {
        return Err(FinHealthError::InsufficientData(
            "cash-flow analysis requires at least 1 period".to_string(),
        ));
    };

    let operating = current.operating_cash_flow;
    let investing = current.investing_cash_flow;
    let financing = current.financing_cash_flow;
    let net_income = current.net_income;
    let capex = current.capital_expenditure;

    let quality_ratio = if net_income.is_zero() {
        Decimal::ZERO
    } else {
        operating / net_income
    };

    let free_cash_flow = operating - capex.abs();

    let total = operating + investing + financing;
    let mix = if total.is_zero() {
        CashFlowMix {
            operating_pct: Decimal::ZERO,
            investing_pct: Decimal::ZERO,
            financing_pct: Decimal::ZERO,
        }
    } else {
        CashFlowMix {
            operating_pct: operating / total * dec!(100),
            investing_pct: investing / total * dec!(100),
            financing_pct: financing / total * dec!(100),
        }
    };

    Ok(CashFlowOutput {
        quality_ratio,
        free_cash_flow,
        assessment: assess(quality_ratio),
        mix,
        figures: CashFlowFigures {
            operating_cash_flow: operating,
            investing_cash_flow: investing,
            financing_cash_flow: financing,
            net_income,
            capital_expenditure: capex,
            total,
        },
    })
}

fn assess(quality_ratio: Decimal) -> CashFlowTier {
    if quality_ratio >= EXCELLENT_FROM {
        CashFlowTier::Excellent
    } else if quality_ratio >= GOOD_FROM {
        CashFlowTier::Good
    } else if quality_ratio >= FAIR_FROM {
        CashFlowTier::Fair
    } else {
        CashFlowTier::NeedsAttention
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::CriticalPresence;
    use rust_decimal_macros::dec;

    fn period(operating: Decimal, net_income: Decimal, capex: Decimal) -> PeriodRecord {
        PeriodRecord {
            date: "2024-12-31".parse().unwrap(),
            symbol: "ACME".to_string(),
            period: "FY".to_string(),
            revenue: dec!(1000),
            gross_profit: Decimal::ZERO,
            operating_income: Decimal::ZERO,
            net_income,
            interest_expense: Decimal::ZERO,
            pre_tax_income: Decimal::ZERO,
            weighted_average_shares: Decimal::ZERO,
            total_assets: dec!(2000),
            total_liabilities: Decimal::ZERO,
            stockholders_equity: dec!(800),
            current_assets: Decimal::ZERO,
            current_liabilities: Decimal::ZERO,
            retained_earnings: Decimal::ZERO,
            long_term_debt: Decimal::ZERO,
            operating_cash_flow: operating,
            investing_cash_flow: dec!(-40),
            financing_cash_flow: dec!(-30),
            capital_expenditure: capex,
            present: CriticalPresence {
                net_income: true,
                total_assets: true,
                revenue: true,
                stockholders_equity: true,
            },
        }
    }

    #[test]
    fn test_empty_periods_error() {
        let err = calculate_cash_flow_quality(&[]).unwrap_err();
        assert!(matches!(err, FinHealthError::InsufficientData(_)));
    }

    #[test]
    fn test_quality_ratio() {
        let out = calculate_cash_flow_quality(&[period(dec!(130), dec!(100), dec!(-20))]).unwrap();
        assert_eq!(out.quality_ratio, dec!(1.3));
        assert_eq!(out.assessment, CashFlowTier::Excellent);
    }

    #[test]
    fn test_zero_net_income_leaves_ratio_at_zero() {
        let out = calculate_cash_flow_quality(&[period(dec!(130), Decimal::ZERO, dec!(-20))]).unwrap();
        assert_eq!(out.quality_ratio, Decimal::ZERO);
        assert_eq!(out.assessment, CashFlowTier::NeedsAttention);
    }

    #[test]
    fn test_free_cash_flow_normalizes_capex_sign() {
        // Providers report capex either signed or unsigned; both subtract.
        let negative = calculate_cash_flow_quality(&[period(dec!(100), dec!(80), dec!(-30))]).unwrap();
        let positive = calculate_cash_flow_quality(&[period(dec!(100), dec!(80), dec!(30))]).unwrap();
        assert_eq!(negative.free_cash_flow, dec!(70));
        assert_eq!(positive.free_cash_flow, dec!(70));
    }

    #[test]
    fn test_mix_percentages() {
        // Flows: 120, -40, -30; total 50.
        let out = calculate_cash_flow_quality(&[period(dec!(120), dec!(80), dec!(-10))]).unwrap();
        assert_eq!(out.figures.total, dec!(50));
        assert_eq!(out.mix.operating_pct, dec!(240));
        assert_eq!(out.mix.investing_pct, dec!(-80));
        assert_eq!(out.mix.financing_pct, dec!(-60));
    }

    #[test]
    fn test_mix_all_zero_when_flows_cancel() {
        let mut p = period(dec!(70), dec!(80), dec!(-10));
        p.investing_cash_flow = dec!(-40);
        p.financing_cash_flow = dec!(-30);
        let out = calculate_cash_flow_quality(&[p]).unwrap();
        assert_eq!(out.figures.total, Decimal::ZERO);
        assert_eq!(out.mix.operating_pct, Decimal::ZERO);
        assert_eq!(out.mix.investing_pct, Decimal::ZERO);
        assert_eq!(out.mix.financing_pct, Decimal::ZERO);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(assess(dec!(1.2)), CashFlowTier::Excellent);
        assert_eq!(assess(dec!(1.19)), CashFlowTier::Good);
        assert_eq!(assess(dec!(1.0)), CashFlowTier::Good);
        assert_eq!(assess(dec!(0.99)), CashFlowTier::Fair);
        assert_eq!(assess(dec!(0.8)), CashFlowTier::Fair);
        assert_eq!(assess(dec!(0.79)), CashFlowTier::NeedsAttention);
        assert_eq!(assess(dec!(-1)), CashFlowTier::NeedsAttention);
    }

    #[test]
    fn test_figures_retained() {
        let out = calculate_cash_flow_quality(&[period(dec!(100), dec!(80), dec!(-30))]).unwrap();
        assert_eq!(out.figures.operating_cash_flow, dec!(100));
        assert_eq!(out.figures.investing_cash_flow, dec!(-40));
        assert_eq!(out.figures.financing_cash_flow, dec!(-30));
        assert_eq!(out.figures.net_income, dec!(80));
        assert_eq!(out.figures.capital_expenditure, dec!(-30));
    }

    #[test]
    fn test_only_most_recent_period_used() {
        let current = period(dec!(120), dec!(100), dec!(-10));
        let mut stale = period(dec!(999), dec!(1), dec!(-999));
        stale.date = "2023-12-31".parse().unwrap();
        let out = calculate_cash_flow_quality(&[current, stale]).unwrap();
        assert_eq!(out.quality_ratio, dec!(1.2));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let out = calculate_cash_flow_quality(&[period(dec!(100), dec!(80), dec!(-30))]).unwrap();
        let json = serde_json::to_string(&out).unwrap();
        let deser: CashFlowOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(out, deser);
    }
}
