use crate::gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    // --- fatal construction errors: the group never becomes reachable ---
    #[error("group '{group}' is missing its '{role}' role")]
    MissingRole { group: String, role: String },

    // --- authorization ---
    #[error("you need the {required} role (or administrator) to do that")]
    NotAuthorized { required: String },

    #[error("administrator permission required")]
    AdminOnly,

    // --- argument errors: recoverable, reported to the caller ---
    #[error("no user provided")]
    NoUserProvided,

    #[error("cannot {0} yourself")]
    CannotTargetSelf(&'static str),

    #[error("group name '{0}' has no command-safe characters")]
    InvalidName(String),

    // --- not-found ---
    #[error("group not found: {0}")]
    GroupNotFound(String),

    // --- conflicts ---
    #[error("a group named '{0}' already exists")]
    AlreadyExists(String),

    #[error("a group is already registered under '{0}'")]
    DuplicateGroup(String),

    // --- transport ---
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, GroupError>;
