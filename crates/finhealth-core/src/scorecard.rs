//! Nine-test solvency and improvement scorecard.
//!
//! Binary signals over the two most recent periods:
//!
//! **Profitability**:
//! 1. ROA > 0
//! 2. Operating cash flow > 0
//! 3. ROA improved year-over-year
//! 4. Operating cash flow above net income
//!
//! **Leverage / Liquidity**:
//! 5. Long-term-debt-to-assets ratio decreased
//! 6. Current ratio increased
//! 7. No share dilution
//!
//! **Operating efficiency**:
//! 8. Gross margin increased
//! 9. Asset turnover increased
//!
//! Zero denominators are substituted with 1 so the tests stay total over
//! zero-defaulted records. Every sub-test retains the raw figures it was
//! computed from, not just the 0/1 outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinHealthError;
use crate::statements::PeriodRecord;
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Coarse reading of the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStrength {
    /// 7-9 points.
    Excellent,
    /// 5-6 points.
    Good,
    /// 3-4 points.
    Average,
    /// 0-2 points.
    NeedsImprovement,
}

impl std::fmt::Display for ScoreStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Average => write!(f, "average"),
            Self::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// A 0/1 sub-test with the single figure it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalValue {
    pub passed: bool,
    pub value: Decimal,
}

/// A 0/1 sub-test comparing the current period against the prior one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalComparison {
    pub passed: bool,
    pub current: Decimal,
    pub previous: Decimal,
}

/// Accrual-style test: operating cash flow measured against net income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccrualSignal {
    pub passed: bool,
    pub operating_cash_flow: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilitySignals {
    pub roa_positive: SignalValue,
    pub cfo_positive: SignalValue,
    pub roa_improvement: SignalComparison,
    pub cfo_exceeds_net_income: AccrualSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageSignals {
    pub debt_ratio_decreasing: SignalComparison,
    pub current_ratio_increasing: SignalComparison,
    pub no_dilution: SignalComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencySignals {
    pub gross_margin_increasing: SignalComparison,
    pub asset_turnover_increasing: SignalComparison,
}

/// Full scorecard breakdown with the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardOutput {
    /// Total score (0-9).
    pub total_score: u8,
    pub strength: ScoreStrength,
    pub profitability: ProfitabilitySignals,
    pub leverage: LeverageSignals,
    pub efficiency: EfficiencySignals,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// Zero denominators substitute 1; the substituted ratio feeds the test as-is.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    let denominator = if denominator.is_zero() {
        Decimal::ONE
    } else {
        denominator
    };
    numerator / denominator
}

fn classify(score: u8) -> ScoreStrength {
    match score {
        7..=9 => ScoreStrength::Excellent,
        5..=6 => ScoreStrength::Good,
        3..=4 => ScoreStrength::Average,
        _ => ScoreStrength::NeedsImprovement,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the nine-signal scorecard over the two most recent periods.
pub fn calculate_scorecard(periods: &[PeriodRecord]) -> FinHealthResult<ScorecardOutput> {
    if periods.len() < 2 {
        return Err(FinHealthError::InsufficientData(
            "scorecard requires at least 2 periods".to_string(),
        ));
    }
    let current = &periods[0];
    let previous = &periods[1];

    // ---- Profitability ----
    let current_roa = ratio(current.net_income, current.total_assets);
    let previous_roa = ratio(previous.net_income, previous.total_assets);
    let roa_positive = SignalValue {
        passed: current_roa > Decimal::ZERO,
        value: current_roa,
    };
    let cfo_positive = SignalValue {
        passed: current.operating_cash_flow > Decimal::ZERO,
        value: current.operating_cash_flow,
    };
    let roa_improvement = SignalComparison {
        passed: current_roa > previous_roa,
        current: current_roa,
        previous: previous_roa,
    };
    let cfo_exceeds_net_income = AccrualSignal {
        passed: current.operating_cash_flow > current.net_income,
        operating_cash_flow: current.operating_cash_flow,
        net_income: current.net_income,
    };

    // ---- Leverage / liquidity ----
    let current_debt_ratio = ratio(current.long_term_debt, current.total_assets);
    let previous_debt_ratio = ratio(previous.long_term_debt, previous.total_assets);
    let debt_ratio_decreasing = SignalComparison {
        passed: current_debt_ratio < previous_debt_ratio,
        current: current_debt_ratio,
        previous: previous_debt_ratio,
    };
    let current_ratio = ratio(current.current_assets, current.current_liabilities);
    let previous_current_ratio = ratio(previous.current_assets, previous.current_liabilities);
    let current_ratio_increasing = SignalComparison {
        passed: current_ratio > previous_current_ratio,
        current: current_ratio,
        previous: previous_current_ratio,
    };
    let no_dilution = SignalComparison {
        passed: current.weighted_average_shares <= previous.weighted_average_shares,
        current: current.weighted_average_shares,
        previous: previous.weighted_average_shares,
    };

    // ---- Efficiency ----
    let current_gross_margin = ratio(current.gross_profit, current.revenue);
    let previous_gross_margin = ratio(previous.gross_profit, previous.revenue);
    let gross_margin_increasing = SignalComparison {
        passed: current_gross_margin > previous_gross_margin,
        current: current_gross_margin,
        previous: previous_gross_margin,
    };
    let current_turnover = ratio(current.revenue, current.total_assets);
    let previous_turnover = ratio(previous.revenue, previous.total_assets);
    let asset_turnover_increasing = SignalComparison {
        passed: current_turnover > previous_turnover,
        current: current_turnover,
        previous: previous_turnover,
    };

    // ---- Tally ----
    let signals = [
        roa_positive.passed,
        cfo_positive.passed,
        roa_improvement.passed,
        cfo_exceeds_net_income.passed,
        debt_ratio_decreasing.passed,
        current_ratio_increasing.passed,
        no_dilution.passed,
        gross_margin_increasing.passed,
        asset_turnover_increasing.passed,
    ];
    let total_score = signals.iter().filter(|&&s| s).count() as u8;

    Ok(ScorecardOutput {
        total_score,
        strength: classify(total_score),
        profitability: ProfitabilitySignals {
            roa_positive,
            cfo_positive,
            roa_improvement,
            cfo_exceeds_net_income,
        },
        leverage: LeverageSignals {
            debt_ratio_decreasing,
            current_ratio_increasing,
            no_dilution,
        },
        efficiency: EfficiencySignals {
            gross_margin_increasing,
            asset_turnover_increasing,
        },
    })
}

// ===========================================================================
// Tests
// ===========================================================================
