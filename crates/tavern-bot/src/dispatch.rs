//! Routes parsed invocations to the owning group controller and turns
//! the error taxonomy into user-visible replies.
//!
//! Every request produces exactly one reply. Argument, authorization,
//! and not-found errors get targeted messages; anything unexpected is
//! logged with its source chain and summarized as a generic failure
//! notice — nothing fails silently from the caller's perspective.

use crate::request::{GroupAction, Request};
use std::sync::Arc;
use tavern_core::gateway::Gateway;
use tavern_core::provision;
use tavern_core::types::{Caller, UserId};
use tavern_core::{GroupError, GroupHandle, Registry, Result};
use tracing::error;

pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn Gateway>, registry: Arc<Registry>) -> Self {
        Self { gateway, registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one invocation, always yielding a reply.
    pub async fn dispatch(&self, caller: Caller, request: Request) -> String {
        match self.try_dispatch(caller, request).await {
            Ok(reply) => reply,
            Err(err) => reply_for(&err),
        }
    }

    async fn try_dispatch(&self, caller: Caller, request: Request) -> Result<String> {
        match request {
            Request::Create { name } => {
                let handle = provision::create_group(
                    self.gateway.as_ref(),
                    &self.registry,
                    caller,
                    name.as_deref(),
                )
                .await?;
                let group = handle.snapshot().await;
                Ok(format!(
                    "Created group '{}'. Its commands live under `{}`.",
                    group.display_name, group.command_name
                ))
            }
            Request::Group { group, action } => {
                let handle = self
                    .registry
                    .lookup(&group)
                    .ok_or_else(|| GroupError::GroupNotFound(group.clone()))?;
                self.run_action(caller, &group, &handle, action).await
            }
            Request::PurgeGroups => {
                let purged =
                    provision::purge_groups(self.gateway.as_ref(), &self.registry, caller).await?;
                if purged.is_empty() {
                    Ok("No groups to delete.".to_string())
                } else {
                    Ok(format!("Deleted groups: {}", purged.join(", ")))
                }
            }
        }
    }

    async fn run_action(
        &self,
        caller: Caller,
        group: &str,
        handle: &GroupHandle,
        action: GroupAction,
    ) -> Result<String> {
        let gateway = self.gateway.as_ref();
        match action {
            GroupAction::AddMember { target } => {
                handle.add_member(gateway, caller, target).await?;
                let target = target.ok_or(GroupError::NoUserProvided)?;
                Ok(format!("Added {} to {group}.", user_label(target)))
            }
            GroupAction::KickMember { target } => {
                let promoted = handle.kick_member(gateway, caller, target).await?;
                let target = target.ok_or(GroupError::NoUserProvided)?;
                Ok(with_promotion(
                    format!("Kicked {} from {group}.", user_label(target)),
                    promoted,
                ))
            }
            GroupAction::Leave => {
                let promoted = handle.leave(gateway, caller).await?;
                Ok(with_promotion(format!("You left {group}."), promoted))
            }
            GroupAction::AddGm { target } => {
                handle.add_gm(gateway, caller, target).await?;
                let target = target.ok_or(GroupError::NoUserProvided)?;
                Ok(format!("Made {} a GM of {group}.", user_label(target)))
            }
            GroupAction::ResignGm => {
                let promoted = handle.resign_gm(gateway, caller).await?;
                Ok(with_promotion(
                    format!("You resigned as GM of {group}."),
                    promoted,
                ))
            }
        }
    }
}

fn user_label(user: UserId) -> String {
    format!("<@{user}>")
}

fn with_promotion(mut reply: String, promoted: Option<UserId>) -> String {
    if let Some(user) = promoted {
        reply.push_str(&format!(" {} is now a GM.", user_label(user)));
    }
    reply
}

/// Translate an error into the reply the caller sees.
fn reply_for(err: &GroupError) -> String {
    match err {
        // Argument and conflict errors: the error message is the reply.
        GroupError::NoUserProvided
        | GroupError::CannotTargetSelf(_)
        | GroupError::InvalidName(_)
        | GroupError::AlreadyExists(_)
        | GroupError::DuplicateGroup(_)
        | GroupError::NotAuthorized { .. }
        | GroupError::AdminOnly => format!("{err}."),

        GroupError::GroupNotFound(name) => format!(
            "`{name}` not found. You should check with an admin if you think it should exist."
        ),

        // Construction and gateway failures are not the caller's fault;
        // log the chain and send a generic notice.
        GroupError::MissingRole { .. } | GroupError::Gateway(_) => {
            error!(error = %err, source = ?std::error::Error::source(err), "command failed");
            "There was an error executing the command.".to_string()
        }
    }
}
