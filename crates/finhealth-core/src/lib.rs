//! Financial-statement health scoring engine.
//!
//! Normalizes multi-period corporate statements from three
//! independently-shaped provider tables (income, balance sheet, cash flow)
//! into unified per-period records, triages data quality, and computes four
//! independent scoring models:
//!
//! - a nine-test solvency/improvement scorecard ([`scorecard`])
//! - a five-component weighted bankruptcy-risk index ([`risk_index`])
//! - a three-factor return-on-equity decomposition ([`decomposition`])
//! - a cash-flow quality analysis ([`cashflow`])
//!
//! The terminal [`bundle::AnalysisBundle`] is a pure function of the
//! inputs: the engine holds no state, performs no I/O, and is safe to
//! invoke concurrently across companies.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

pub mod bundle;
pub mod cashflow;
pub mod decomposition;
pub mod error;
pub mod market;
pub mod quality;
pub mod risk_index;
pub mod scorecard;
pub mod statements;
pub mod types;

pub use error::FinHealthError;
pub use types::*;

/// Standard result type for all engine operations.
pub type FinHealthResult<T> = Result<T, FinHealthError>;
