//! Group provisioning, startup seeding, and the operator purge.

use crate::error::{GroupError, Result};
use crate::gateway::{ChannelKind, Gateway};
use crate::group::{Group, GroupHandle};
use crate::guard;
use crate::name;
use crate::registry::Registry;
use crate::types::{
    Caller, OverwriteTarget, PermissionOverwrite, Permissions, RoleId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Every new group starts with one text and one voice channel, both named
/// `general`.
pub const DEFAULT_CHANNEL_NAME: &str = "general";

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Provision a group: role pair, container with its three permission
/// overwrites, starter channels, creator grants, registry entry — one
/// unit. If a container with the requested display name already exists
/// the create is idempotent: `AlreadyExists`, nothing touched.
///
/// A mid-provision failure aborts without rollback; already-created roles
/// or containers stay behind (the purge sweep is the recovery tool) and
/// no registry entry is made.
pub async fn create_group(
    gateway: &dyn Gateway,
    registry: &Registry,
    caller: Caller,
    requested_name: Option<&str>,
) -> Result<Arc<GroupHandle>> {
    let display_name = match requested_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => name::default_group_name(),
    };
    let command_name = name::normalize(&display_name);
    if command_name.is_empty() {
        return Err(GroupError::InvalidName(display_name));
    }

    if container_exists(gateway, &display_name).await? || registry.lookup(&command_name).is_some() {
        return Err(GroupError::AlreadyExists(display_name));
    }

    let provisioned = provision_resources(gateway, caller, &display_name).await;
    let group = match provisioned {
        Ok(group) => group,
        Err(err) => {
            warn!(
                group = %display_name,
                error = %err,
                "provisioning failed part-way; created platform objects are not rolled back"
            );
            return Err(err);
        }
    };

    let handle = Arc::new(GroupHandle::new(group));
    registry.register(&command_name, handle.clone())?;
    info!(group = %display_name, command = %command_name, "group provisioned");
    Ok(handle)
}

async fn container_exists(gateway: &dyn Gateway, display_name: &str) -> Result<bool> {
    let containers = gateway.list_containers().await?;
    Ok(containers.iter().any(|c| c.name == display_name))
}

async fn provision_resources(
    gateway: &dyn Gateway,
    caller: Caller,
    display_name: &str,
) -> Result<Group> {
    let member_role = gateway
        .create_role(&name::member_role_name(display_name))
        .await?;
    let gm_role = gateway.create_role(&name::gm_role_name(display_name)).await?;

    let overwrites = container_overwrites(member_role, gm_role);
    let container = gateway.create_container(display_name, &overwrites).await?;

    gateway
        .create_channel(container, DEFAULT_CHANNEL_NAME, ChannelKind::Text)
        .await?;
    gateway
        .create_channel(container, DEFAULT_CHANNEL_NAME, ChannelKind::Voice)
        .await?;

    // The creator starts as the group's first member and first GM.
    gateway.grant_role(caller.user, member_role).await?;
    gateway.grant_role(caller.user, gm_role).await?;

    Ok(Group::new(container, display_name, member_role, gm_role))
}

/// The three overwrites every group container carries: everyone shut out,
/// members read/write/connect/speak, GMs additionally managing channels,
/// permissions, and voice membership.
pub fn container_overwrites(member_role: RoleId, gm_role: RoleId) -> [PermissionOverwrite; 3] {
    [
        PermissionOverwrite {
            target: OverwriteTarget::Everyone,
            allow: Permissions::NONE,
        },
        PermissionOverwrite {
            target: OverwriteTarget::Role(member_role),
            allow: Permissions::MEMBER,
        },
        PermissionOverwrite {
            target: OverwriteTarget::Role(gm_role),
            allow: Permissions::GM,
        },
    ]
}

// ---------------------------------------------------------------------------
// Startup seeding
// ---------------------------------------------------------------------------

/// Rebuild the registry from platform state: one group per container whose
/// role pair resolves. Containers without the role pair are foreign (not
/// groups) and are skipped. Returns the number of groups registered.
pub async fn seed_registry(gateway: &dyn Gateway, registry: &Registry) -> Result<usize> {
    let mut seeded = 0;
    for container in gateway.list_containers().await? {
        match Group::resolve(gateway, &container).await {
            Ok(group) => {
                let command_name = group.command_name.clone();
                if command_name.is_empty() {
                    warn!(container = %container.name, "container name normalizes to nothing, skipping");
                    continue;
                }
                match registry.register(&command_name, Arc::new(GroupHandle::new(group))) {
                    Ok(()) => seeded += 1,
                    Err(err) => {
                        warn!(container = %container.name, error = %err, "skipping container during seed")
                    }
                }
            }
            Err(GroupError::MissingRole { .. }) => {
                debug!(container = %container.name, "container has no role pair, not a group");
            }
            Err(err) => return Err(err),
        }
    }
    info!(groups = seeded, "registry seeded from platform scan");
    Ok(seeded)
}

// ---------------------------------------------------------------------------
// Purge (operator full reset)
// ---------------------------------------------------------------------------

/// Remove every group's channels, container, and roles in one pass, then
/// sweep containers that never became groups and role pairs whose
/// container is already gone. Admin-only. Returns the display names of
/// everything swept.
pub async fn purge_groups(
    gateway: &dyn Gateway,
    registry: &Registry,
    caller: Caller,
) -> Result<Vec<String>> {
    guard::require_admin(caller)?;
    let mut purged = Vec::new();

    // Pass 1: registered groups.
    for key in registry.command_names() {
        let Ok(handle) = registry.unregister(&key) else {
            continue;
        };
        let group = handle.snapshot().await;
        for channel in gateway.container_channels(group.container_id).await? {
            gateway.delete_channel(channel).await?;
        }
        gateway.delete_container(group.container_id).await?;
        gateway.delete_role(group.member_role_id).await?;
        gateway.delete_role(group.gm_role_id).await?;
        purged.push(group.display_name);
    }

    // Pass 2: leftover containers (half-provisioned or foreign).
    for container in gateway.list_containers().await? {
        for channel in gateway.container_channels(container.id).await? {
            gateway.delete_channel(channel).await?;
        }
        gateway.delete_container(container.id).await?;
        if let Some(role) = gateway
            .find_role(&name::member_role_name(&container.name))
            .await?
        {
            gateway.delete_role(role).await?;
        }
        if let Some(role) = gateway.find_role(&name::gm_role_name(&container.name)).await? {
            gateway.delete_role(role).await?;
        }
        purged.push(container.name);
    }

    // Pass 3: orphaned role pairs with no container left.
    for role in gateway.list_roles().await? {
        let display = name::display_from_member_role(&role.name)
            .or_else(|| name::display_from_gm_role(&role.name));
        if let Some(display) = display {
            let display = display.to_string();
            gateway.delete_role(role.id).await?;
            if !purged.contains(&display) {
                purged.push(display);
            }
        }
    }

    info!(count = purged.len(), "purged all groups");
    Ok(purged)
}
