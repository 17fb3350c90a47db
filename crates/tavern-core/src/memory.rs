//! In-memory `Gateway` implementation.
//!
//! Backs the test suites and the sandbox binary. Mutations performed by
//! the core go through the `Gateway` trait; mutations a container owner
//! would perform through the platform UI (rename, delete, channel moves)
//! have dedicated helpers that also emit the matching `GatewayEvent`.

use crate::gateway::{
    ChannelKind, ContainerInfo, Gateway, GatewayError, GatewayEvent, GatewayResult, RoleInfo,
};
use crate::types::{ChannelId, ContainerId, PermissionOverwrite, RoleId, UserId};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use tokio::sync::mpsc;

#[derive(Debug)]
struct RoleState {
    name: String,
    members: BTreeSet<UserId>,
}

#[derive(Debug)]
struct ChannelState {
    #[allow(dead_code)]
    name: String,
    #[allow(dead_code)]
    kind: ChannelKind,
    /// Kept pointing at the old parent after that container is deleted,
    /// so the deletion cascade can still find survivors.
    container: Option<ContainerId>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    roles: BTreeMap<RoleId, RoleState>,
    containers: BTreeMap<ContainerId, String>,
    channels: BTreeMap<ChannelId, ChannelState>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MemoryGateway {
    state: Mutex<State>,
    events: mpsc::UnboundedSender<GatewayEvent>,
}

impl MemoryGateway {
    /// Build a gateway plus the receiving end of its event stream.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GatewayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                state: Mutex::new(State::default()),
                events: tx,
            },
            rx,
        )
    }

    fn emit(&self, event: GatewayEvent) {
        // Receiver may have been dropped by tests that poll nothing.
        let _ = self.events.send(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory gateway lock poisoned")
    }

    // -----------------------------------------------------------------------
    // External (owner-initiated) mutations
    // -----------------------------------------------------------------------

    /// The owner renames a container through the platform UI.
    pub fn rename_container(&self, id: ContainerId, new_name: &str) -> GatewayResult<()> {
        let old_name = {
            let mut state = self.lock();
            let name = state
                .containers
                .get_mut(&id)
                .ok_or_else(|| GatewayError::NotFound(format!("container {id}")))?;
            std::mem::replace(name, new_name.to_string())
        };
        self.emit(GatewayEvent::ContainerRenamed {
            id,
            old_name,
            new_name: new_name.to_string(),
        });
        Ok(())
    }

    /// The owner deletes a container through the platform UI. Child
    /// channels survive (orphaned), as on the real platform.
    pub fn remove_container(&self, id: ContainerId) -> GatewayResult<()> {
        {
            let mut state = self.lock();
            state
                .containers
                .remove(&id)
                .ok_or_else(|| GatewayError::NotFound(format!("container {id}")))?;
        }
        self.emit(GatewayEvent::ContainerDeleted { id });
        Ok(())
    }

    /// The owner drags a channel to another container (or out of all).
    pub fn move_channel(
        &self,
        channel: ChannelId,
        to: Option<ContainerId>,
    ) -> GatewayResult<()> {
        let from = {
            let mut state = self.lock();
            let entry = state
                .channels
                .get_mut(&channel)
                .ok_or_else(|| GatewayError::NotFound(format!("channel {channel}")))?;
            std::mem::replace(&mut entry.container, to)
        };
        self.emit(GatewayEvent::ChannelMoved { channel, from, to });
        Ok(())
    }

    /// Total live channels; test convenience.
    pub fn channel_count(&self) -> usize {
        self.lock().channels.len()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn create_role(&self, name: &str) -> GatewayResult<RoleId> {
        let mut state = self.lock();
        let id = RoleId(state.next_id());
        state.roles.insert(
            id,
            RoleState {
                name: name.to_string(),
                members: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    async fn rename_role(&self, role: RoleId, name: &str) -> GatewayResult<()> {
        let mut state = self.lock();
        let entry = state
            .roles
            .get_mut(&role)
            .ok_or_else(|| GatewayError::NotFound(format!("role {role}")))?;
        entry.name = name.to_string();
        Ok(())
    }

    async fn delete_role(&self, role: RoleId) -> GatewayResult<()> {
        self.lock()
            .roles
            .remove(&role)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(format!("role {role}")))
    }

    async fn find_role(&self, name: &str) -> GatewayResult<Option<RoleId>> {
        Ok(self
            .lock()
            .roles
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(&id, _)| id))
    }

    async fn list_roles(&self) -> GatewayResult<Vec<RoleInfo>> {
        Ok(self
            .lock()
            .roles
            .iter()
            .map(|(&id, r)| RoleInfo {
                id,
                name: r.name.clone(),
            })
            .collect())
    }

    async fn role_members(&self, role: RoleId) -> GatewayResult<Vec<UserId>> {
        let state = self.lock();
        let entry = state
            .roles
            .get(&role)
            .ok_or_else(|| GatewayError::NotFound(format!("role {role}")))?;
        Ok(entry.members.iter().copied().collect())
    }

    async fn grant_role(&self, user: UserId, role: RoleId) -> GatewayResult<()> {
        let mut state = self.lock();
        let entry = state
            .roles
            .get_mut(&role)
            .ok_or_else(|| GatewayError::NotFound(format!("role {role}")))?;
        entry.members.insert(user);
        Ok(())
    }

    async fn revoke_role(&self, user: UserId, role: RoleId) -> GatewayResult<()> {
        let mut state = self.lock();
        let entry = state
            .roles
            .get_mut(&role)
            .ok_or_else(|| GatewayError::NotFound(format!("role {role}")))?;
        entry.members.remove(&user);
        Ok(())
    }

    async fn has_role(&self, user: UserId, role: RoleId) -> GatewayResult<bool> {
        let state = self.lock();
        Ok(state
            .roles
            .get(&role)
            .is_some_and(|r| r.members.contains(&user)))
    }

    async fn create_container(
        &self,
        name: &str,
        _overwrites: &[PermissionOverwrite],
    ) -> GatewayResult<ContainerId> {
        let mut state = self.lock();
        let id = ContainerId(state.next_id());
        state.containers.insert(id, name.to_string());
        Ok(id)
    }

    async fn delete_container(&self, id: ContainerId) -> GatewayResult<()> {
        self.lock()
            .containers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(format!("container {id}")))
    }

    async fn list_containers(&self) -> GatewayResult<Vec<ContainerInfo>> {
        Ok(self
            .lock()
            .containers
            .iter()
            .map(|(&id, name)| ContainerInfo {
                id,
                name: name.clone(),
            })
            .collect())
    }

    async fn container_channels(&self, id: ContainerId) -> GatewayResult<Vec<ChannelId>> {
        Ok(self
            .lock()
            .channels
            .iter()
            .filter(|(_, c)| c.container == Some(id))
            .map(|(&id, _)| id)
            .collect())
    }

    async fn create_channel(
        &self,
        container: ContainerId,
        name: &str,
        kind: ChannelKind,
    ) -> GatewayResult<ChannelId> {
        let mut state = self.lock();
        if !state.containers.contains_key(&container) {
            return Err(GatewayError::NotFound(format!("container {container}")));
        }
        let id = ChannelId(state.next_id());
        state.channels.insert(
            id,
            ChannelState {
                name: name.to_string(),
                kind,
                container: Some(container),
            },
        );
        Ok(id)
    }

    async fn delete_channel(&self, id: ChannelId) -> GatewayResult<()> {
        self.lock()
            .channels
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(format!("channel {id}")))
    }
}
