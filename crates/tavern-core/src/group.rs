use crate::error::{GroupError, Result};
use crate::gateway::{ContainerInfo, Gateway};
use crate::name;
use crate::types::{ContainerId, RoleId};
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// The central entity: one container, one member role, one GM role, one
/// command surface, created and destroyed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Stable id of the backing container; immutable for the group's life.
    pub container_id: ContainerId,
    /// Human-readable name; changes when the owner renames the container.
    pub display_name: String,
    /// Normalized command-safe token; always `normalize(display_name)`.
    pub command_name: String,
    pub member_role_id: RoleId,
    pub gm_role_id: RoleId,
}

impl Group {
    pub fn new(
        container_id: ContainerId,
        display_name: impl Into<String>,
        member_role_id: RoleId,
        gm_role_id: RoleId,
    ) -> Self {
        let display_name = display_name.into();
        let command_name = name::normalize(&display_name);
        Self {
            container_id,
            display_name,
            command_name,
            member_role_id,
            gm_role_id,
        }
    }

    /// Build a `Group` for an existing container by resolving its role pair
    /// through the gateway. Either role missing is a fatal construction
    /// error: the container is not (or no longer is) a valid group.
    pub async fn resolve(gateway: &dyn Gateway, container: &ContainerInfo) -> Result<Self> {
        let member_name = name::member_role_name(&container.name);
        let gm_name = name::gm_role_name(&container.name);

        let member_role_id = gateway.find_role(&member_name).await?.ok_or_else(|| {
            GroupError::MissingRole {
                group: container.name.clone(),
                role: member_name.clone(),
            }
        })?;
        let gm_role_id =
            gateway
                .find_role(&gm_name)
                .await?
                .ok_or_else(|| GroupError::MissingRole {
                    group: container.name.clone(),
                    role: gm_name.clone(),
                })?;

        Ok(Self::new(
            container.id,
            container.name.clone(),
            member_role_id,
            gm_role_id,
        ))
    }

    /// Apply a display-name change, recomputing the command name. Returns
    /// the previous command name.
    pub(crate) fn set_display_name(&mut self, display_name: impl Into<String>) -> String {
        self.display_name = display_name.into();
        std::mem::replace(&mut self.command_name, name::normalize(&self.display_name))
    }
}

// ---------------------------------------------------------------------------
// GroupHandle
// ---------------------------------------------------------------------------

/// A registered group: the immutable container id plus the mutable `Group`
/// state behind a per-group mutex. All operations on one group serialize on
/// this lock, so a rename notification can never interleave with an
/// in-flight membership edit.
#[derive(Debug)]
pub struct GroupHandle {
    container_id: ContainerId,
    group: Mutex<Group>,
}

impl GroupHandle {
    pub fn new(group: Group) -> Self {
        Self {
            container_id: group.container_id,
            group: Mutex::new(group),
        }
    }

    /// Container id, readable without taking the group lock.
    pub fn container_id(&self) -> ContainerId {
        self.container_id
    }

    pub(crate) fn state(&self) -> &Mutex<Group> {
        &self.group
    }

    /// A point-in-time copy of the group state.
    pub async fn snapshot(&self) -> Group {
        self.group.lock().await.clone()
    }

    pub async fn command_name(&self) -> String {
        self.group.lock().await.command_name.clone()
    }
}
