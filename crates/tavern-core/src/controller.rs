//! Per-group operations: the membership command surface and the
//! platform-event handlers a group self-synchronizes with.
//!
//! Every operation takes the group's lock for its whole duration, so a
//! rename notification can never observe (or leave behind) a half-applied
//! membership edit. Gateway calls within one operation are sequential.

use crate::error::{GroupError, Result};
use crate::gateway::Gateway;
use crate::group::GroupHandle;
use crate::guard::{self, Gate};
use crate::name;
use crate::registry::Registry;
use crate::succession;
use crate::types::{Caller, ChannelId, ContainerId, UserId};
use tracing::{debug, info, warn};

impl GroupHandle {
    // -----------------------------------------------------------------------
    // Membership commands
    // -----------------------------------------------------------------------

    /// `add <user>` — GM-gated. Grants the member role.
    pub async fn add_member(
        &self,
        gateway: &dyn Gateway,
        caller: Caller,
        target: Option<UserId>,
    ) -> Result<()> {
        let group = self.state().lock().await;
        guard::require(gateway, caller, &group, Gate::Gm).await?;
        let target = target.ok_or(GroupError::NoUserProvided)?;
        gateway.grant_role(target, group.member_role_id).await?;
        info!(group = %group.command_name, user = %target, "added member");
        Ok(())
    }

    /// `kick <user>` — GM-gated. Self-kick is rejected before any role
    /// mutation. Removes both roles, then re-checks succession in case the
    /// kicked user was the last GM. Returns the auto-promoted member, if
    /// succession promoted one.
    pub async fn kick_member(
        &self,
        gateway: &dyn Gateway,
        caller: Caller,
        target: Option<UserId>,
    ) -> Result<Option<UserId>> {
        let group = self.state().lock().await;
        guard::require(gateway, caller, &group, Gate::Gm).await?;
        let target = target.ok_or(GroupError::NoUserProvided)?;
        if target == caller.user {
            return Err(GroupError::CannotTargetSelf("kick"));
        }
        gateway.revoke_role(target, group.member_role_id).await?;
        gateway.revoke_role(target, group.gm_role_id).await?;
        info!(group = %group.command_name, user = %target, "kicked member");
        succession::restore(gateway, &group, target).await
    }

    /// `leave` — member-gated, self-targeting. Removes both of the
    /// caller's roles, then re-checks succession.
    pub async fn leave(&self, gateway: &dyn Gateway, caller: Caller) -> Result<Option<UserId>> {
        let group = self.state().lock().await;
        guard::require(gateway, caller, &group, Gate::Member).await?;
        gateway.revoke_role(caller.user, group.member_role_id).await?;
        gateway.revoke_role(caller.user, group.gm_role_id).await?;
        info!(group = %group.command_name, user = %caller.user, "member left");
        succession::restore(gateway, &group, caller.user).await
    }

    /// `gm add <user>` — GM-gated. A GM must also be a member, so this
    /// grants both roles.
    pub async fn add_gm(
        &self,
        gateway: &dyn Gateway,
        caller: Caller,
        target: Option<UserId>,
    ) -> Result<()> {
        let group = self.state().lock().await;
        guard::require(gateway, caller, &group, Gate::Gm).await?;
        let target = target.ok_or(GroupError::NoUserProvided)?;
        gateway.grant_role(target, group.member_role_id).await?;
        gateway.grant_role(target, group.gm_role_id).await?;
        info!(group = %group.command_name, user = %target, "added GM");
        Ok(())
    }

    /// `gm resign` — GM-gated, self-targeting. Removes only the GM role
    /// (the caller stays a member), then re-checks succession.
    pub async fn resign_gm(&self, gateway: &dyn Gateway, caller: Caller) -> Result<Option<UserId>> {
        let group = self.state().lock().await;
        guard::require(gateway, caller, &group, Gate::Gm).await?;
        gateway.revoke_role(caller.user, group.gm_role_id).await?;
        info!(group = %group.command_name, user = %caller.user, "GM resigned");
        succession::restore(gateway, &group, caller.user).await
    }

    // -----------------------------------------------------------------------
    // Platform-event handlers
    // -----------------------------------------------------------------------

    /// The backing container was renamed. Recompute the command name; a
    /// change that normalizes identically is cosmetic and only updates the
    /// display name. Otherwise re-key the registry, update the group
    /// state, and rename both roles, after which the command surface
    /// resolves only under the new name.
    pub async fn on_container_renamed(
        &self,
        gateway: &dyn Gateway,
        registry: &Registry,
        new_name: &str,
    ) -> Result<()> {
        let mut group = self.state().lock().await;
        if group.display_name == new_name {
            return Ok(());
        }
        let new_command = name::normalize(new_name);
        if new_command == group.command_name {
            debug!(
                group = %group.command_name,
                from = %group.display_name,
                to = %new_name,
                "cosmetic rename, command name unchanged"
            );
            group.display_name = new_name.to_string();
            return Ok(());
        }
        // Re-key the registry first: its rename enforces key uniqueness
        // atomically, and a collision failure here leaves group state and
        // roles untouched. Group state follows under the same group lock,
        // so a role-rename failure below can only leave role names stale,
        // never a registry key that disagrees with `command_name`.
        registry.rename(&group.command_name, &new_command)?;
        let old_command = group.set_display_name(new_name);
        gateway
            .rename_role(group.member_role_id, &name::member_role_name(new_name))
            .await?;
        gateway
            .rename_role(group.gm_role_id, &name::gm_role_name(new_name))
            .await?;
        info!(from = %old_command, to = %group.command_name, "group renamed");
        Ok(())
    }

    /// The backing container was deleted. Cascade: surviving child
    /// channels first, then the member role, then the GM role, then the
    /// registry entry. Channels go before roles so a stale role never
    /// transiently widens access to an orphaned channel. The registry
    /// entry is dropped even when the cascade fails part-way: the
    /// container is gone, so a command surface left behind could never
    /// serve anything but errors.
    pub async fn on_container_deleted(
        &self,
        gateway: &dyn Gateway,
        registry: &Registry,
    ) -> Result<()> {
        let group = self.state().lock().await;
        let cascade: Result<()> = async {
            for channel in gateway.container_channels(group.container_id).await? {
                gateway.delete_channel(channel).await?;
            }
            gateway.delete_role(group.member_role_id).await?;
            gateway.delete_role(group.gm_role_id).await?;
            Ok(())
        }
        .await;
        if let Err(err) = &cascade {
            warn!(group = %group.command_name, error = %err, "teardown cascade failed part-way");
        }
        registry.unregister(&group.command_name)?;
        cascade?;
        info!(group = %group.command_name, "group deleted, teardown complete");
        Ok(())
    }

    /// A channel left this group's container. Orphaned channels are not
    /// allowed to outlive their group's permission boundary, so the
    /// escaped channel is force-deleted.
    pub async fn on_channel_moved(
        &self,
        gateway: &dyn Gateway,
        channel: ChannelId,
        from: Option<ContainerId>,
        to: Option<ContainerId>,
    ) -> Result<()> {
        if from != Some(self.container_id()) || to == Some(self.container_id()) {
            return Ok(());
        }
        let group = self.state().lock().await;
        warn!(group = %group.command_name, %channel, "channel escaped container, deleting");
        gateway.delete_channel(channel).await?;
        Ok(())
    }
}
