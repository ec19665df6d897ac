//! Terminal assembly of one analysis request into a serializable bundle.
//!
//! The assembler normalizes the raw statement tables, builds the quality
//! report, runs the four scoring models and composes everything into an
//! [`AnalysisBundle`]. A model that cannot run contributes an error
//! section; assembly itself never fails, so partial analysis is always
//! preferred over total failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cashflow::{self, CashFlowOutput};
use crate::decomposition::{self, DecompositionOutput};
use crate::market;
use crate::quality::{self, QualityReport};
use crate::risk_index::{self, RiskIndexOutput};
use crate::scorecard::{self, ScorecardOutput};
use crate::statements::{self, PeriodRecord};
use crate::types::{ModelOutcome, SourceRecord};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Raw per-company input: the three statement tables plus auxiliary
/// sources, exactly as returned by the data provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub symbol: String,
    pub income_statements: Vec<SourceRecord>,
    pub balance_sheets: Vec<SourceRecord>,
    pub cash_flow_statements: Vec<SourceRecord>,
    #[serde(default)]
    pub enterprise_values: Vec<SourceRecord>,
    #[serde(default)]
    pub profile: Option<SourceRecord>,
    #[serde(default)]
    pub key_metrics: Vec<SourceRecord>,
}

/// The complete analysis for one company. Immutable once assembled;
/// intended to be serialized as a nested document for a narrative
/// generator or a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub symbol: String,
    pub quality: QualityReport,
    pub limitations: Vec<String>,

    pub scorecard: ModelOutcome<ScorecardOutput>,
    pub risk_index: ModelOutcome<RiskIndexOutput>,
    pub return_decomposition: ModelOutcome<DecompositionOutput>,
    pub cash_flow_analysis: ModelOutcome<CashFlowOutput>,

    /// Secondary price-earnings lookup; `None` when no source carries it.
    pub pe_ratio: Option<Decimal>,

    /// Normalized records the models were computed from.
    pub periods: Vec<PeriodRecord>,
    /// Raw auxiliary tables, passed through for deep-dive consumers.
    pub enterprise_values: Vec<SourceRecord>,
    pub profile: Option<SourceRecord>,
    pub key_metrics: Vec<SourceRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline: normalize, triage quality, score, assemble.
pub fn analyze(input: &AnalysisInput) -> AnalysisBundle {
    let periods = statements::merge_statements(
        &input.income_statements,
        &input.balance_sheets,
        &input.cash_flow_statements,
    );

    let quality = quality::build_quality_report(&periods, &input.enterprise_values);
    let limitations = quality::limitations(&quality);

    let scorecard: ModelOutcome<ScorecardOutput> =
        scorecard::calculate_scorecard(&periods).into();
    let risk_index: ModelOutcome<RiskIndexOutput> =
        risk_index::calculate_risk_index(&periods, &input.enterprise_values).into();
    let return_decomposition: ModelOutcome<DecompositionOutput> =
        decomposition::calculate_return_decomposition(&periods).into();
    let cash_flow_analysis: ModelOutcome<CashFlowOutput> =
        cashflow::calculate_cash_flow_quality(&periods).into();

    let pe_ratio = market::lookup_pe_ratio(input.profile.as_ref(), &input.key_metrics);

    AnalysisBundle {
        symbol: input.symbol.clone(),
        quality,
        limitations,
        scorecard,
        risk_index,
        return_decomposition,
        cash_flow_analysis,
        pe_ratio,
        periods,
        enterprise_values: input.enterprise_values.clone(),
        profile: input.profile.clone(),
        key_metrics: input.key_metrics.clone(),
    }
}

impl AnalysisBundle {
    /// Serialize the bundle as the nested JSON document consumed by
    /// narrative generators and dashboards.
    pub fn to_json_string(&self) -> FinHealthResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
