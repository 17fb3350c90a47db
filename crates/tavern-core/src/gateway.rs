//! The Role/Container Gateway: the narrow interface through which the core
//! talks to the hosting platform's role and channel API, and the
//! asynchronous change notifications it receives back.
//!
//! Every call is a blocking remote operation from the core's point of
//! view. Calls are issued sequentially within one logical operation and
//! are never retried; a transient failure fails the enclosing operation.

use crate::types::{ChannelId, ContainerId, PermissionOverwrite, RoleId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("platform object not found: {0}")]
    NotFound(String),

    #[error("platform request failed: {0}")]
    Request(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: ContainerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Text,
    Voice,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Asynchronous platform notifications a controller self-synchronizes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// The backing container's display name changed (owner renamed it).
    ContainerRenamed {
        id: ContainerId,
        old_name: String,
        new_name: String,
    },
    /// The backing container was deleted out from under the group.
    ContainerDeleted { id: ContainerId },
    /// A channel changed parent container. `from`/`to` are `None` for
    /// uncategorized channels.
    ChannelMoved {
        channel: ChannelId,
        from: Option<ContainerId>,
        to: Option<ContainerId>,
    },
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Gateway: Send + Sync {
    // --- roles ---
    async fn create_role(&self, name: &str) -> GatewayResult<RoleId>;
    async fn rename_role(&self, role: RoleId, name: &str) -> GatewayResult<()>;
    async fn delete_role(&self, role: RoleId) -> GatewayResult<()>;
    async fn find_role(&self, name: &str) -> GatewayResult<Option<RoleId>>;
    async fn list_roles(&self) -> GatewayResult<Vec<RoleInfo>>;

    // --- role membership ---
    async fn role_members(&self, role: RoleId) -> GatewayResult<Vec<UserId>>;
    async fn grant_role(&self, user: UserId, role: RoleId) -> GatewayResult<()>;
    async fn revoke_role(&self, user: UserId, role: RoleId) -> GatewayResult<()>;
    async fn has_role(&self, user: UserId, role: RoleId) -> GatewayResult<bool>;

    // --- containers ---
    async fn create_container(
        &self,
        name: &str,
        overwrites: &[PermissionOverwrite],
    ) -> GatewayResult<ContainerId>;
    async fn delete_container(&self, id: ContainerId) -> GatewayResult<()>;
    async fn list_containers(&self) -> GatewayResult<Vec<ContainerInfo>>;

    /// Channels currently parented to `id`. Must keep answering from the
    /// last known parenting after the container itself is deleted, so the
    /// deletion cascade can find the survivors.
    async fn container_channels(&self, id: ContainerId) -> GatewayResult<Vec<ChannelId>>;

    // --- channels ---
    async fn create_channel(
        &self,
        container: ContainerId,
        name: &str,
        kind: ChannelKind,
    ) -> GatewayResult<ChannelId>;
    async fn delete_channel(&self, id: ChannelId) -> GatewayResult<()>;
}
