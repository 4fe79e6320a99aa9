// role.rs
// Purpose: platform roles as seen by the engine, and the clearance they carry

use crate::clearance::{ClearanceCode, ClearanceRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Platform snowflake of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Platform snowflake of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u64);

impl UserId {
    /// `<@id>` markup understood by the platform.
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

impl RoleId {
    /// `<@&id>` markup understood by the platform.
    pub fn mention(self) -> String {
        format!("<@&{}>", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role as the platform reports it.
///
/// `position` is the platform's own ordering (higher is more senior) and is
/// unrelated to clearance rank. The clearance code is never stored here; it
/// is derived from `name` on every access so renames are always honored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: RoleId,
    pub name: String,
    pub position: i64,
}

impl RoleRef {
    pub fn new(id: u64, name: impl Into<String>, position: i64) -> Self {
        Self {
            id: RoleId(id),
            name: name.into(),
            position,
        }
    }

    /// Text before the first whitespace, or the whole name if there is none.
    pub fn leading_token(&self) -> &str {
        self.name
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default()
    }
}

/// Clearance code carried by a role name such as `"RA Access"`.
///
/// Returns `None` for unrelated server roles and for unknown tokens.
pub fn resolve_role(registry: &ClearanceRegistry, role: &RoleRef) -> Option<ClearanceCode> {
    registry.lookup(role.leading_token())
}

/// Most senior clearance an executor holds, or `Unranked` ("UN").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutorRank {
    Cleared(ClearanceCode),
    Unranked,
}

impl fmt::Display for ExecutorRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorRank::Cleared(code) => write!(f, "{code}"),
            ExecutorRank::Unranked => f.write_str("UN"),
        }
    }
}

/// Resolve every held role and keep the code with the lowest registry rank.
///
/// Only the hierarchy order decides; platform positions of the held roles
/// play no part, and the result does not depend on the order roles arrive in.
pub fn highest_rank<'a, I>(registry: &ClearanceRegistry, held_roles: I) -> ExecutorRank
where
    I: IntoIterator<Item = &'a RoleRef>,
{
    let best = held_roles
        .into_iter()
        .filter_map(|role| resolve_role(registry, role))
        .filter_map(|code| registry.rank(code).map(|rank| (rank, code)))
        .min_by_key(|(rank, _)| *rank);

    match best {
        Some((rank, code)) => {
            debug!(%code, rank, "resolved executor clearance");
            ExecutorRank::Cleared(code)
        }
        None => ExecutorRank::Unranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClearanceRegistry {
        ClearanceRegistry::standard()
    }

    #[test]
    fn resolves_code_prefixed_names() {
        let reg = registry();
        for code in ["OS", "DA", "CA", "SA", "RA", "LA", "XA", "AA"] {
            let role = RoleRef::new(1, format!("{code} Anything at all"), 1);
            assert_eq!(resolve_role(&reg, &role).map(|c| c.as_str()), Some(code));
        }
    }

    #[test]
    fn bare_code_without_whitespace_resolves() {
        let role = RoleRef::new(1, "CA", 1);
        assert_eq!(resolve_role(&registry(), &role), Some(ClearanceCode::CA));
    }

    #[test]
    fn other_shapes_do_not_resolve() {
        let reg = registry();
        let names = [
            "Moderator",
            "RAccess",
            " RA leading space",
            "ra lower",
            "UN Unranked",
            "",
        ];
        for name in names {
            let role = RoleRef::new(1, name, 1);
            assert_eq!(resolve_role(&reg, &role), None, "{name:?}");
        }
    }

    #[test]
    fn highest_rank_picks_most_senior() {
        let roles = vec![
            RoleRef::new(1, "RA Access", 9),
            RoleRef::new(2, "Moderator", 20),
            RoleRef::new(3, "CA Something", 5),
            RoleRef::new(4, "LA Limited", 2),
        ];
        assert_eq!(
            highest_rank(&registry(), &roles),
            ExecutorRank::Cleared(ClearanceCode::CA)
        );
    }

    #[test]
    fn highest_rank_ignores_platform_position() {
        // The junior code sits higher in the platform's own list.
        let roles = vec![
            RoleRef::new(1, "AA Automated", 50),
            RoleRef::new(2, "DA Director", 1),
        ];
        assert_eq!(
            highest_rank(&registry(), &roles),
            ExecutorRank::Cleared(ClearanceCode::DA)
        );
    }

    #[test]
    fn highest_rank_is_order_invariant() {
        let mut roles = vec![
            RoleRef::new(1, "SA Security", 3),
            RoleRef::new(2, "XA Lab", 4),
            RoleRef::new(3, "OS Overseer", 1),
        ];
        let forward = highest_rank(&registry(), &roles);
        roles.reverse();
        assert_eq!(forward, highest_rank(&registry(), &roles));
        assert_eq!(forward, ExecutorRank::Cleared(ClearanceCode::OS));
    }

    #[test]
    fn duplicate_codes_are_not_an_error() {
        let roles = vec![
            RoleRef::new(1, "SA Security", 3),
            RoleRef::new(2, "SA Security Backup", 7),
        ];
        assert_eq!(
            highest_rank(&registry(), &roles),
            ExecutorRank::Cleared(ClearanceCode::SA)
        );
    }

    #[test]
    fn no_clearance_roles_is_unranked() {
        let roles = vec![
            RoleRef::new(1, "Moderator", 3),
            RoleRef::new(2, "@everyone", 0),
        ];
        let rank = highest_rank(&registry(), &roles);
        assert_eq!(rank, ExecutorRank::Unranked);
        assert_eq!(rank.to_string(), "UN");
        assert_eq!(
            highest_rank(&registry(), &Vec::<RoleRef>::new()),
            ExecutorRank::Unranked
        );
    }

    #[test]
    fn mentions_use_platform_markup() {
        assert_eq!(UserId(42).mention(), "<@42>");
        assert_eq!(RoleId(7).mention(), "<@&7>");
    }
}
