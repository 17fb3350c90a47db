//! Authorization gates attached to every membership-mutating operation.
//!
//! Evaluation order: a platform administrator satisfies any gate;
//! otherwise the caller must hold the gate's role for this group. A
//! caller failing its gate never reaches the operation body.

use crate::error::{GroupError, Result};
use crate::gateway::Gateway;
use crate::group::Group;
use crate::types::Caller;

/// Which of the group's two roles an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Member,
    Gm,
}

impl Gate {
    fn role_label(self) -> &'static str {
        match self {
            Gate::Member => "Member",
            Gate::Gm => "GM",
        }
    }
}

/// Check `caller` against `gate` for `group`. Admin always passes.
pub async fn require(
    gateway: &dyn Gateway,
    caller: Caller,
    group: &Group,
    gate: Gate,
) -> Result<()> {
    if caller.admin {
        return Ok(());
    }
    let role = match gate {
        Gate::Member => group.member_role_id,
        Gate::Gm => group.gm_role_id,
    };
    if gateway.has_role(caller.user, role).await? {
        Ok(())
    } else {
        Err(GroupError::NotAuthorized {
            required: format!("{} {}", group.display_name, gate.role_label()),
        })
    }
}

/// Gate for operator-only commands that are not scoped to one group.
pub fn require_admin(caller: Caller) -> Result<()> {
    if caller.admin {
        Ok(())
    } else {
        Err(GroupError::AdminOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    #[test]
    fn require_admin_accepts_only_admins() {
        assert!(require_admin(Caller::admin(UserId(1))).is_ok());
        assert!(matches!(
            require_admin(Caller::new(UserId(1))).unwrap_err(),
            GroupError::AdminOnly
        ));
    }
}
