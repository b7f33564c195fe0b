//! Order-preserving candidate filters

use crate::domain::{Candidate, DepFilter, RiskFilter};

/// Keep candidates whose risk group passes `risk`
pub fn filter_by_risk(candidates: Vec<Candidate>, risk: RiskFilter) -> Vec<Candidate> {
    if risk == RiskFilter::All {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|c| risk.matches(c.risk_group()))
        .collect()
}

/// Keep candidates whose dependency type passes `dep`
pub fn filter_by_dep(candidates: Vec<Candidate>, dep: DepFilter) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| dep.matches(c.dependency_type))
        .collect()
}
