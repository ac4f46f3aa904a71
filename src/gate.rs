//! Pass/fail decisions over a frozen scan history.

use crate::config::BehaviorConfig;
use crate::history::ScanHistory;
use crate::pipeline::exit_codes;
use serde::Serialize;

/// Compliance statuses that count as passing.
const PASSING_STATUSES: &[&str] = &["pass", "passed", "conditional pass"];

/// Whether an upstream compliance status is a pass.
#[must_use]
pub fn is_passing_status(status: &str) -> bool {
    let normalized = status.trim().to_lowercase();
    PASSING_STATUSES.contains(&normalized.as_str())
}

/// Why a build failed the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateFailure {
    PolicyNotPassed { status: String },
    NewFlaws { count: i64, allowed: i64 },
    BlacklistedComponents { count: i64 },
}

impl GateFailure {
    /// Exit code reported for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::PolicyNotPassed { .. } => exit_codes::POLICY_FAILED,
            Self::NewFlaws { .. } => exit_codes::NEW_FLAWS,
            Self::BlacklistedComponents { .. } => exit_codes::BLACKLISTED_COMPONENTS,
        }
    }
}

impl std::fmt::Display for GateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolicyNotPassed { status } => write!(f, "policy compliance is '{status}'"),
            Self::NewFlaws { count, allowed } => {
                write!(f, "{count} new flaws introduced (allowed: {allowed})")
            }
            Self::BlacklistedComponents { count } => {
                write!(f, "{count} blacklisted components found")
            }
        }
    }
}

/// Outcome of evaluating a history against the configured behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GateVerdict {
    pub failures: Vec<GateFailure>,
}

impl GateVerdict {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Exit code of the first failure, or success.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.failures
            .first()
            .map_or(exit_codes::SUCCESS, GateFailure::exit_code)
    }
}

/// Evaluate `history` against `behavior`. Failures are listed in check order:
/// policy, new flaws, blacklisted components.
#[must_use]
pub fn evaluate(history: &ScanHistory, behavior: &BehaviorConfig) -> GateVerdict {
    let mut failures = Vec::new();

    let status = history.policy_compliance_status();
    if behavior.fail_on_policy && !is_passing_status(status) {
        failures.push(GateFailure::PolicyNotPassed {
            status: status.to_string(),
        });
    }

    let allowed = match (behavior.max_new_flaws, behavior.fail_on_new_flaws) {
        (Some(max), true) => Some(max.min(0)),
        (Some(max), false) => Some(max),
        (None, true) => Some(0),
        (None, false) => None,
    };
    let new_flaws = history.total_new_flaws_count();
    if let Some(allowed) = allowed {
        if new_flaws > allowed {
            failures.push(GateFailure::NewFlaws {
                count: new_flaws,
                allowed,
            });
        }
    }

    if behavior.fail_on_blacklisted {
        if let Ok(Some(sca)) = history.sca_history() {
            if sca.has_blacklisted_components() {
                let listed = sca
                    .sca_components()
                    .iter()
                    .filter(|c| c.is_blacklisted())
                    .count();
                let count = sca
                    .blacklisted_components_count()
                    .max(i64::try_from(listed).unwrap_or(i64::MAX));
                failures.push(GateFailure::BlacklistedComponents { count });
            }
        }
    }

    if !failures.is_empty() {
        tracing::debug!(build_id = history.build_id(), failures = failures.len(), "Gate failed");
    }

    GateVerdict { failures }
}
