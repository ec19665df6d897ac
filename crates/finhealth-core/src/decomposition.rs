//! Three-factor return-on-equity decomposition.
//!
//! Per period: net margin x asset turnover x equity multiplier. The
//! directly-computed ROE (net income / equity) is reported alongside the
//! multiplicative one; the two are never reconciled, since drift between
//! them is a data-quality signal for the consumer, not a bug to suppress.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinHealthError;
use crate::statements::PeriodRecord;
use crate::types::{ModelOutcome, Money, Rate};
use crate::FinHealthResult;

/// How many recent periods the decomposition covers.
const PERIOD_WINDOW: usize = 3;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The factor with the largest absolute change between the two newest
/// periods. Exact ties resolve in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoeDriver {
    NetMargin,
    AssetTurnover,
    EquityMultiplier,
}

impl std::fmt::Display for RoeDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetMargin => write!(f, "net margin"),
            Self::AssetTurnover => write!(f, "asset turnover"),
            Self::EquityMultiplier => write!(f, "equity multiplier"),
        }
    }
}

/// Raw figures behind one period's factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionFigures {
    pub net_income: Money,
    pub revenue: Money,
    pub total_assets: Money,
    pub stockholders_equity: Money,
}

/// One period's three-factor breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDecomposition {
    pub date: NaiveDate,
    pub net_margin: Rate,
    pub asset_turnover: Rate,
    pub equity_multiplier: Rate,
    /// Product of the three factors.
    pub roe_calculated: Rate,
    /// Net income over equity, computed independently of the factors.
    pub roe_direct: Rate,
    pub figures: DecompositionFigures,
}

/// Factor deltas between the two newest periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionTrend {
    pub net_margin_change: Rate,
    pub asset_turnover_change: Rate,
    pub equity_multiplier_change: Rate,
    /// Delta of the directly-computed ROE.
    pub roe_change: Rate,
    pub primary_driver: RoeDriver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionOutput {
    /// Up to the three most recent periods, newest first.
    pub periods: Vec<PeriodDecomposition>,
    /// Error variant when fewer than 2 periods are available.
    pub trend: ModelOutcome<DecompositionTrend>,
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

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decompose ROE for up to the three most recent periods.
pub fn calculate_return_decomposition(
    periods: &[PeriodRecord],
) -> FinHealthResult<DecompositionOutput> {
    if periods.is_empty() {
        return Err(FinHealthError::InsufficientData(
            "return decomposition requires at least 1 period".to_string(),
        ));
    }

    let breakdown: Vec<PeriodDecomposition> = periods
        .iter()
        .take(PERIOD_WINDOW)
        .map(decompose_period)
        .collect();

    let trend = compute_trend(&breakdown).into();

    Ok(DecompositionOutput {
        periods: breakdown,
        trend,
    })
}

fn decompose_period(period: &PeriodRecord) -> PeriodDecomposition {
    let net_margin = ratio(period.net_income, period.revenue);
    let asset_turnover = ratio(period.revenue, period.total_assets);
    let equity_multiplier = ratio(period.total_assets, period.stockholders_equity);

    PeriodDecomposition {
        date: period.date,
        net_margin,
        asset_turnover,
        equity_multiplier,
        roe_calculated: net_margin * asset_turnover * equity_multiplier,
        roe_direct: ratio(period.net_income, period.stockholders_equity),
        figures: DecompositionFigures {
            net_income: period.net_income,
            revenue: period.revenue,
            total_assets: period.total_assets,
            stockholders_equity: period.stockholders_equity,
        },
    }
}

fn compute_trend(breakdown: &[PeriodDecomposition]) -> FinHealthResult<DecompositionTrend> {
    if breakdown.len() < 2 {
        return Err(FinHealthError::InsufficientData(
            "trend analysis requires at least 2 periods".to_string(),
        ));
    }
    let current = &breakdown[0];
    let previous = &breakdown[1];

    let net_margin_change = current.net_margin - previous.net_margin;
    let asset_turnover_change = current.asset_turnover - previous.asset_turnover;
    let equity_multiplier_change = current.equity_multiplier - previous.equity_multiplier;
    let roe_change = current.roe_direct - previous.roe_direct;

    // Largest absolute change wins; strict comparison keeps the earlier
    // factor on exact ties.
    let mut primary_driver = RoeDriver::NetMargin;
    let mut largest = net_margin_change.abs();
    if asset_turnover_change.abs() > largest {
        primary_driver = RoeDriver::AssetTurnover;
        largest = asset_turnover_change.abs();
    }
    if equity_multiplier_change.abs() > largest {
        primary_driver = RoeDriver::EquityMultiplier;
    }

    Ok(DecompositionTrend {
        net_margin_change,
        asset_turnover_change,
        equity_multiplier_change,
        roe_change,
        primary_driver,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
