//! Data-quality triage over normalized period records.
//!
//! The validator inspects each period for missing critical fields and
//! implausible values; the reporter aggregates the verdict with a
//! missing-field census and free-text warnings into the quality report
//! that downstream consumers use to discount conclusions drawn from
//! incomplete data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market;
use crate::statements::PeriodRecord;
use crate::types::SourceRecord;

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// The four fields every downstream model leans on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalField {
    NetIncome,
    TotalAssets,
    Revenue,
    StockholdersEquity,
}

impl CriticalField {
    pub const ALL: [CriticalField; 4] = [
        CriticalField::NetIncome,
        CriticalField::TotalAssets,
        CriticalField::Revenue,
        CriticalField::StockholdersEquity,
    ];

    fn is_present(self, period: &PeriodRecord) -> bool {
        match self {
            Self::NetIncome => period.present.net_income,
            Self::TotalAssets => period.present.total_assets,
            Self::Revenue => period.present.revenue,
            Self::StockholdersEquity => period.present.stockholders_equity,
        }
    }

    fn value(self, period: &PeriodRecord) -> Decimal {
        match self {
            Self::NetIncome => period.net_income,
            Self::TotalAssets => period.total_assets,
            Self::Revenue => period.revenue,
            Self::StockholdersEquity => period.stockholders_equity,
        }
    }
}

impl std::fmt::Display for CriticalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NetIncome => "net_income",
            Self::TotalAssets => "total_assets",
            Self::Revenue => "revenue",
            Self::StockholdersEquity => "stockholders_equity",
        };
        write!(f, "{name}")
    }
}

/// Verdict of the per-period completeness and sanity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationVerdict {
    /// No period records at all.
    NoData,
    /// One or more issues, itemized and joined into a single message.
    Warnings(String),
    /// Every check passed.
    Validated,
}

/// Check each period for missing critical fields and implausible values.
pub fn validate_periods(periods: &[PeriodRecord]) -> ValidationVerdict {
    if periods.is_empty() {
        return ValidationVerdict::NoData;
    }

    let mut issues = Vec::new();
    for period in periods {
        for field in CriticalField::ALL {
            if !field.is_present(period) {
                issues.push(format!(
                    "missing critical field: {} ({})",
                    field, period.date
                ));
            }
        }
        if period.total_assets <= Decimal::ZERO {
            issues.push(format!(
                "total assets not positive: {} ({})",
                period.total_assets, period.date
            ));
        }
        if period.revenue < Decimal::ZERO {
            issues.push(format!(
                "negative revenue: {} ({})",
                period.revenue, period.date
            ));
        }
    }

    if issues.is_empty() {
        ValidationVerdict::Validated
    } else {
        ValidationVerdict::Warnings(issues.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Overall completeness verdict of the quality report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completeness {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "partially missing")]
    PartiallyMissing,
}

/// Census entry: one critical field and the periods where its value is
/// absent or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    pub field: CriticalField,
    pub dates: Vec<NaiveDate>,
}

/// Structured data-quality report for one analysis request. Computed
/// fresh on every request; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub validation: ValidationVerdict,
    pub completeness: Completeness,
    pub period_count: usize,
    pub missing_fields: Vec<MissingField>,
    pub warnings: Vec<String>,
}

/// Build the quality report over the normalized records plus the raw
/// market-value source.
pub fn build_quality_report(
    periods: &[PeriodRecord],
    enterprise_values: &[SourceRecord],
) -> QualityReport {
    let validation = validate_periods(periods);

    let mut missing_fields = Vec::new();
    for field in CriticalField::ALL {
        let dates: Vec<NaiveDate> = periods
            .iter()
            .filter(|p| !field.is_present(p) || field.value(p).is_zero())
            .map(|p| p.date)
            .collect();
        if !dates.is_empty() {
            missing_fields.push(MissingField { field, dates });
        }
    }

    let mut warnings = Vec::new();
    if periods.len() < 2 {
        warnings.push(
            "fewer than 2 periods available; year-over-year comparisons may be unreliable"
                .to_string(),
        );
    }
    if market::latest_market_cap(enterprise_values).is_zero() {
        warnings.push(
            "no market capitalization figure; risk-index component D may be inaccurate"
                .to_string(),
        );
    }

    let completeness = if missing_fields.is_empty() && warnings.is_empty() {
        Completeness::Good
    } else {
        Completeness::PartiallyMissing
    };

    QualityReport {
        validation,
        completeness,
        period_count: periods.len(),
        missing_fields,
        warnings,
    }
}

/// Free-text caveats for consumers that weight conclusions by data
/// quality.
pub fn limitations(report: &QualityReport) -> Vec<String> {
    let mut notes = Vec::new();
    if matches!(report.validation, ValidationVerdict::Warnings(_)) {
        notes.push(
            "some financial figures are missing or implausible; scoring accuracy may suffer"
                .to_string(),
        );
    }
    if report.period_count < 3 {
        notes.push("fewer than 3 periods available; trend analysis is limited".to_string());
    }
    if !report.missing_fields.is_empty() {
        notes.push(
            "critical fields are missing in some periods; treat affected results with caution"
                .to_string(),
        );
    }
    notes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
