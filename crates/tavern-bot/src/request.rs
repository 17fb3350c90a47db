//! The parsed-invocation model the hosting dispatch framework delivers.
//!
//! Commands are data, not generated types: the dispatcher resolves
//! `group.subcommand` by registry lookup against these descriptors.

use tavern_core::types::UserId;

/// One inbound command invocation, already parsed by the host framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `create-group [name]` — provision a new group.
    Create { name: Option<String> },
    /// `<group> <subcommand> …` — an operation on one group's surface,
    /// addressed by the group's current command name.
    Group { group: String, action: GroupAction },
    /// `clear-groups` — operator full reset.
    PurgeGroups,
}

/// The per-group command subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAction {
    /// `add <user>`
    AddMember { target: Option<UserId> },
    /// `kick <user>`
    KickMember { target: Option<UserId> },
    /// `leave`
    Leave,
    /// `gm add <user>`
    AddGm { target: Option<UserId> },
    /// `gm resign`
    ResignGm,
}
