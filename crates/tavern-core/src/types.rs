use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Platform identifiers
// ---------------------------------------------------------------------------

macro_rules! snowflake {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

snowflake!(
    /// A workspace-wide user id issued by the platform.
    UserId
);
snowflake!(
    /// A role id issued by the platform.
    RoleId
);
snowflake!(
    /// A chat or voice channel id issued by the platform.
    ChannelId
);
snowflake!(
    /// Id of the platform's grouping construct holding child channels.
    ContainerId
);

// ---------------------------------------------------------------------------
// Caller
// ---------------------------------------------------------------------------

/// The identity behind an inbound operation, as resolved by the hosting
/// dispatch framework. `admin` reflects platform-level administrator
/// permission and satisfies every authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user: UserId,
    pub admin: bool,
}

impl Caller {
    pub fn new(user: UserId) -> Self {
        Self { user, admin: false }
    }

    pub fn admin(user: UserId) -> Self {
        Self { user, admin: true }
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Channel-level permission set used in container overwrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub view_channel: bool,
    pub send_messages: bool,
    pub connect: bool,
    pub speak: bool,
    pub manage_channels: bool,
    pub manage_permissions: bool,
    pub move_members: bool,
    pub mute_members: bool,
}

impl Permissions {
    /// Everything denied. Applied to the default (everyone) role so a
    /// group's container is invisible to non-members.
    pub const NONE: Self = Self {
        view_channel: false,
        send_messages: false,
        connect: false,
        speak: false,
        manage_channels: false,
        manage_permissions: false,
        move_members: false,
        mute_members: false,
    };

    /// Read/write/connect/speak. Applied to the member role.
    pub const MEMBER: Self = Self {
        view_channel: true,
        send_messages: true,
        connect: true,
        speak: true,
        manage_channels: false,
        manage_permissions: false,
        move_members: false,
        mute_members: false,
    };

    /// Member permissions plus channel/permission/membership management.
    /// Applied to the GM role.
    pub const GM: Self = Self {
        view_channel: true,
        send_messages: true,
        connect: true,
        speak: true,
        manage_channels: true,
        manage_permissions: true,
        move_members: true,
        mute_members: true,
    };
}

/// Whom a permission overwrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteTarget {
    /// The guild-wide default role.
    Everyone,
    Role(RoleId),
}

/// One permission overwrite on a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub target: OverwriteTarget,
    pub allow: Permissions,
}
