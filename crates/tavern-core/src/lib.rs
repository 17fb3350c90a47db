//! `tavern-core` — group lifecycle and access control for a shared chat
//! workspace.
//!
//! A *group* is one container of channels, a member role, a GM role, and
//! a command surface reachable under the group's normalized name, all
//! provisioned and torn down as a unit. This crate owns the four core
//! components:
//!
//! ```text
//! Registry        command_name → GroupHandle (process-wide, injected)
//!     │
//!     ▼
//! GroupHandle     per-group state behind a per-group lock
//!     │              membership ops + rename/delete event handlers
//!     ▼
//! Guard           admin-or-role gate in front of every operation
//!     │
//!     ▼
//! Succession      "members ⇒ at least one GM" repair after departures
//! ```
//!
//! The platform's role/channel API sits behind the [`gateway::Gateway`]
//! trait; [`memory::MemoryGateway`] is the in-process implementation used
//! by the tests and the sandbox binary. The hosting dispatch framework
//! (transport, argument parsing, help rendering) lives outside this
//! crate.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod group;
pub mod guard;
pub mod memory;
pub mod name;
pub mod provision;
pub mod registry;
pub mod succession;
pub mod types;

pub use error::{GroupError, Result};
pub use group::{Group, GroupHandle};
pub use registry::Registry;
