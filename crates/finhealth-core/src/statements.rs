//! Statement normalization: the three-way merge of income, balance-sheet
//! and cash-flow tables into unified per-period records.
//!
//! Each provider table is a list of flat JSON records keyed by an ISO
//! `date`. A [`PeriodRecord`] is produced only for dates present in all
//! three tables; a period missing from any one source is silently dropped.
//! Numeric fields default to zero when the source omits them, and the
//! three cash-flow fields accept an alternate field name to absorb
//! provider schema variants.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{decimal_from_value, Money, SourceRecord};

// ---------------------------------------------------------------------------
// Period record
// ---------------------------------------------------------------------------

/// One reporting period (typically one fiscal year) after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Reporting date; unique key of the period.
    pub date: NaiveDate,
    pub symbol: String,
    /// Reporting-period label as given by the provider (e.g. "FY").
    pub period: String,

    // Income statement
    pub revenue: Money,
    pub gross_profit: Money,
    pub operating_income: Money,
    pub net_income: Money,
    pub interest_expense: Money,
    pub pre_tax_income: Money,
    pub weighted_average_shares: Decimal,

    // Balance sheet
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub stockholders_equity: Money,
    pub current_assets: Money,
    pub current_liabilities: Money,
    pub retained_earnings: Money,
    pub long_term_debt: Money,

    // Cash flow statement
    pub operating_cash_flow: Money,
    pub investing_cash_flow: Money,
    pub financing_cash_flow: Money,
    pub capital_expenditure: Money,

    /// Whether the source carried a non-null value for each critical
    /// field. Zero-defaulting erases that distinction; the validator
    /// needs it back.
    pub present: CriticalPresence,
}

/// Source-presence flags for the validator's critical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPresence {
    pub net_income: bool,
    pub total_assets: bool,
    pub revenue: bool,
    pub stockholders_equity: bool,
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

fn num(rec: &SourceRecord, key: &str) -> Decimal {
    rec.get(key).and_then(decimal_from_value).unwrap_or(Decimal::ZERO)
}

/// First *present* key wins, even when its value is null: a
/// present-but-null primary field resolves to zero instead of falling
/// through to the alternate name.
fn num_candidates(rec: &SourceRecord, keys: &[&str]) -> Decimal {
    for key in keys {
        if let Some(value) = rec.get(*key) {
            return decimal_from_value(value).unwrap_or(Decimal::ZERO);
        }
    }
    Decimal::ZERO
}

fn text(rec: &SourceRecord, key: &str) -> String {
    match rec.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn non_null(rec: &SourceRecord, key: &str) -> bool {
    matches!(rec.get(key), Some(v) if !v.is_null())
}

fn period_date(rec: &SourceRecord) -> Option<NaiveDate> {
    match rec.get("date") {
        Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge the three statement tables into period records.
///
/// Only dates present in all three tables survive; the result is ordered
/// most recent first. An empty intersection yields an empty vec, never an
/// error.
pub fn merge_statements(
    income: &[SourceRecord],
    balance: &[SourceRecord],
    cash_flow: &[SourceRecord],
) -> Vec<PeriodRecord> {
    let income_by_date = index_by_date(income);
    let balance_by_date = index_by_date(balance);
    let cash_by_date = index_by_date(cash_flow);

    let mut records = Vec::new();
    // BTreeMap iterates ascending; walk it backwards for newest-first.
    for (date, inc) in income_by_date.iter().rev() {
        let (Some(bal), Some(cf)) = (balance_by_date.get(date), cash_by_date.get(date)) else {
            continue;
        };
        records.push(build_record(*date, inc, bal, cf));
    }
    records
}

fn index_by_date(records: &[SourceRecord]) -> BTreeMap<NaiveDate, &SourceRecord> {
    let mut by_date = BTreeMap::new();
    for rec in records {
        // A record without a parseable ISO date is invisible to the merge;
        // a duplicate date keeps the later record.
        if let Some(date) = period_date(rec) {
            by_date.insert(date, rec);
        }
    }
    by_date
}

fn build_record(
    date: NaiveDate,
    inc: &SourceRecord,
    bal: &SourceRecord,
    cf: &SourceRecord,
) -> PeriodRecord {
    PeriodRecord {
        date,
        symbol: text(inc, "symbol"),
        period: text(inc, "period"),

        revenue: num(inc, "revenue"),
        gross_profit: num(inc, "grossProfit"),
        operating_income: num(inc, "operatingIncome"),
        net_income: num(inc, "netIncome"),
        interest_expense: num(inc, "interestExpense"),
        pre_tax_income: num(inc, "incomeBeforeTax"),
        weighted_average_shares: num(inc, "weightedAverageShsOut"),

        total_assets: num(bal, "totalAssets"),
        total_liabilities: num(bal, "totalLiabilities"),
        stockholders_equity: num(bal, "totalStockholdersEquity"),
        current_assets: num(bal, "totalCurrentAssets"),
        current_liabilities: num(bal, "totalCurrentLiabilities"),
        retained_earnings: num(bal, "retainedEarnings"),
        long_term_debt: num(bal, "longTermDebt"),

        operating_cash_flow: num_candidates(
            cf,
            &["netCashProvidedByOperatingActivities", "operatingCashFlow"],
        ),
        investing_cash_flow: num_candidates(
            cf,
            &[
                "netCashProvidedByInvestingActivities",
                // Provider schema variant; the misspelling is theirs.
                "netCashUsedForInvestingActivites",
            ],
        ),
        financing_cash_flow: num_candidates(
            cf,
            &[
                "netCashProvidedByFinancingActivities",
                "netCashUsedProvidedByFinancingActivities",
            ],
        ),
        capital_expenditure: num(cf, "capitalExpenditure"),

        present: CriticalPresence {
            net_income: non_null(inc, "netIncome"),
            total_assets: non_null(bal, "totalAssets"),
            revenue: non_null(inc, "revenue"),
            stockholders_equity: non_null(bal, "totalStockholdersEquity"),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
