//! GM succession: a group with at least one member always has at least
//! one GM.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::group::Group;
use crate::types::UserId;
use tracing::info;

/// Re-check the succession invariant after an operation that may have
/// emptied the GM set, promoting a member if it did.
///
/// Runs synchronously inside the triggering operation, under the group's
/// lock. The heir is the first member in the gateway's iteration order
/// (unspecified but deterministic per call), skipping `departed` — the
/// user whose removal triggered the check — so a resigning GM is not
/// handed the role straight back while other members exist. A resigner
/// who is the sole remaining member does inherit again: the invariant
/// leaves nobody else. Returns the promoted user, if any.
pub async fn restore(
    gateway: &dyn Gateway,
    group: &Group,
    departed: UserId,
) -> Result<Option<UserId>> {
    let gms = gateway.role_members(group.gm_role_id).await?;
    if !gms.is_empty() {
        return Ok(None);
    }
    let members = gateway.role_members(group.member_role_id).await?;
    if members.is_empty() {
        // The invariant holds vacuously.
        return Ok(None);
    }
    let heir = members
        .iter()
        .copied()
        .find(|&m| m != departed)
        .unwrap_or(members[0]);
    gateway.grant_role(heir, group.gm_role_id).await?;
    info!(group = %group.command_name, user = %heir, "promoted member to GM after succession check");
    Ok(Some(heir))
}
