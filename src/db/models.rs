use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::intake::SalaryPeriod;
use crate::profile::FinancialProfile;
use crate::tax::{Regime, RegimeComparisonResult};

/// A saved submission and its comparison, keyed by session id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSubmission {
    pub session_id: String,
    /// Annual amounts the comparison was computed from
    pub profile: FinancialProfile,
    /// Period the amounts were originally entered in
    pub salary_period: SalaryPeriod,
    pub comparison: RegimeComparisonResult,
    pub selected_regime: Regime,
    pub created_at: DateTime<Utc>,
}
