//! Authorization gate for grant/revoke invocations
//!
//! Two guards run in order and each is terminal: the executor must hold the
//! platform's manage-roles permission, and the target role must sit strictly
//! below the bot's own top role. Everything else falls through to
//! `Approved`. The gate never fails; every outcome is a `Decision`.

use crate::clearance::ClearanceRegistry;
use crate::role::{highest_rank, resolve_role, ExecutorRank, RoleRef, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way the clearance role moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Grant,
    Revoke,
}

impl Action {
    /// Name of the command that triggers this action.
    pub fn command_name(self) -> &'static str {
        match self {
            Action::Grant => "grant",
            Action::Revoke => "revoke",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

/// What the platform tells us about the user running the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorContext {
    pub held_roles: Vec<RoleRef>,
    pub has_manage_role_permission: bool,
}

/// One parsed command invocation. Consumed exactly once by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub action: Action,
    pub target_user: UserId,
    pub target_role: RoleRef,
    pub executor: ExecutorContext,
    pub bot_top_role_position: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    /// Executor lacks the platform's manage-roles permission.
    NoManagePermission,
    /// Target role is at or above the bot's highest role.
    RoleAboveBot,
}

impl DenyReason {
    /// User-facing explanation.
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::NoManagePermission => "⚠️ You lack permission.",
            DenyReason::RoleAboveBot => {
                "⚠️ I cannot modify that role; it is higher than my top role."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Denied(DenyReason),
    Approved {
        /// Display-only seniority badge; it does not gate the action.
        executor_rank: ExecutorRank,
        /// Registry label of the target role, or its raw name when the
        /// role carries no known clearance code.
        target_descriptor: String,
    },
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved { .. })
    }
}

/// Label shown for a target role. Unknown codes fall back to the raw name.
pub fn target_descriptor(registry: &ClearanceRegistry, role: &RoleRef) -> String {
    resolve_role(registry, role)
        .and_then(|code| registry.describe(code))
        .map(str::to_string)
        .unwrap_or_else(|| role.name.clone())
}

pub fn authorize(registry: &ClearanceRegistry, invocation: &Invocation) -> Decision {
    if !invocation.executor.has_manage_role_permission {
        return Decision::Denied(DenyReason::NoManagePermission);
    }

    if invocation.target_role.position >= invocation.bot_top_role_position {
        return Decision::Denied(DenyReason::RoleAboveBot);
    }

    Decision::Approved {
        executor_rank: highest_rank(registry, &invocation.executor.held_roles),
        target_descriptor: target_descriptor(registry, &invocation.target_role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clearance::ClearanceCode;

    fn invocation(permission: bool, target_position: i64, bot_position: i64) -> Invocation {
        Invocation {
            action: Action::Grant,
            target_user: UserId(1001),
            target_role: RoleRef::new(77, "RA Access", target_position),
            executor: ExecutorContext {
                held_roles: vec![RoleRef::new(55, "CA Something", 5)],
                has_manage_role_permission: permission,
            },
            bot_top_role_position: bot_position,
        }
    }

    #[test]
    fn missing_permission_short_circuits() {
        let reg = ClearanceRegistry::standard();
        // Would also fail the bot-position check; permission is reported first.
        for (target, bot) in [(3, 10), (12, 10), (10, 10)] {
            assert_eq!(
                authorize(&reg, &invocation(false, target, bot)),
                Decision::Denied(DenyReason::NoManagePermission)
            );
        }
    }

    #[test]
    fn role_at_or_above_bot_is_denied() {
        let reg = ClearanceRegistry::standard();
        assert_eq!(
            authorize(&reg, &invocation(true, 12, 10)),
            Decision::Denied(DenyReason::RoleAboveBot)
        );
        assert_eq!(
            authorize(&reg, &invocation(true, 10, 10)),
            Decision::Denied(DenyReason::RoleAboveBot)
        );
    }

    #[test]
    fn role_below_bot_is_approved() {
        let reg = ClearanceRegistry::standard();
        let decision = authorize(&reg, &invocation(true, 9, 10));
        assert_eq!(
            decision,
            Decision::Approved {
                executor_rank: ExecutorRank::Cleared(ClearanceCode::CA),
                target_descriptor: "Level 1 System Access | Restricted Access".into(),
            }
        );
    }

    #[test]
    fn executor_rank_does_not_gate() {
        // An unranked executor may still grant the most senior clearance.
        let reg = ClearanceRegistry::standard();
        let mut inv = invocation(true, 3, 10);
        inv.executor.held_roles = vec![RoleRef::new(1, "Member", 1)];
        inv.target_role = RoleRef::new(2, "OS Overseer", 3);
        match authorize(&reg, &inv) {
            Decision::Approved { executor_rank, target_descriptor } => {
                assert_eq!(executor_rank, ExecutorRank::Unranked);
                assert_eq!(target_descriptor, "Level 5 System Access | Overseer System");
            }
            other => panic!("expected approval, got {other:?}"),
        }
    }

    #[test]
    fn unknown_target_uses_raw_name() {
        let reg = ClearanceRegistry::standard();
        let role = RoleRef::new(3, "Moderator", 2);
        assert_eq!(target_descriptor(&reg, &role), "Moderator");
    }

    #[test]
    fn action_round_trips_command_names() {
        assert_eq!(Action::Grant.command_name(), "grant");
        assert_eq!(Action::Revoke.to_string(), "revoke");
    }
}
