// audit.rs
// Purpose: structured audit record for every grant/revoke decision.
// Records are emitted through tracing only; nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::gate::{Action, Decision, DenyReason, Invocation};
use crate::role::{ExecutorRank, RoleId, UserId};

/// Severity levels for structured log classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// What finally happened to the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Applied,
    Denied(DenyReason),
    PlatformFailure(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub target_user: UserId,
    pub target_role: RoleId,
    pub target_role_name: String,
    pub executor_rank: Option<ExecutorRank>,
    pub outcome: AuditOutcome,
    pub severity: LogLevel,
}

impl AuditEvent {
    /// Audit record for a decision before any platform call is made.
    pub fn for_decision(invocation: &Invocation, decision: &Decision) -> Self {
        let (executor_rank, outcome, severity) = match decision {
            Decision::Denied(reason) => (None, AuditOutcome::Denied(*reason), LogLevel::Warn),
            Decision::Approved { executor_rank, .. } => {
                (Some(*executor_rank), AuditOutcome::Applied, LogLevel::Info)
            }
        };
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            action: invocation.action,
            target_user: invocation.target_user,
            target_role: invocation.target_role.id,
            target_role_name: invocation.target_role.name.clone(),
            executor_rank,
            outcome,
            severity,
        }
    }

    /// Mark the platform call as failed.
    pub fn with_platform_failure(mut self, message: impl Into<String>) -> Self {
        self.outcome = AuditOutcome::PlatformFailure(message.into());
        self.severity = LogLevel::Error;
        self
    }

    pub fn write_to_log(&self) {
        let rank = self
            .executor_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        match (&self.severity, &self.outcome) {
            (LogLevel::Error, AuditOutcome::PlatformFailure(message)) => error!(
                audit_id = %self.id,
                action = %self.action,
                user = %self.target_user,
                role = %self.target_role,
                executor_rank = %rank,
                error = %message,
                "clearance change failed at platform"
            ),
            (_, AuditOutcome::Denied(reason)) => warn!(
                audit_id = %self.id,
                action = %self.action,
                user = %self.target_user,
                role = %self.target_role,
                reason = ?reason,
                "clearance change denied"
            ),
            _ => info!(
                audit_id = %self.id,
                action = %self.action,
                user = %self.target_user,
                role = %self.target_role,
                role_name = %self.target_role_name,
                executor_rank = %rank,
                "clearance change applied"
            ),
        }
    }
}
